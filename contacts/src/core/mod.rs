//! Pure contact logic: record types, response shaping and photo naming.
//!
//! Nothing here touches the filesystem or the database.

pub mod photo_name;
pub mod response;
pub mod types;
