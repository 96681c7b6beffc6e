//! I/O-backed components: configuration, record storage and photo storage.

pub mod config;
pub mod contact_store;
pub mod photo_store;
