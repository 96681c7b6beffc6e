//! Contact-management backend.
//!
//! Records live in a relational [`ContactStore`](io::contact_store::ContactStore),
//! photos in a [`PhotoStore`](io::photo_store::PhotoStore), and
//! [`ContactService`](service::ContactService) composes the two into the
//! create / read / update / delete / upload-photo lifecycle.
//!
//! - **[`core`]**: record types, response shaping, photo file naming. No I/O.
//! - **[`io`]**: configuration, SQLite store, filesystem photo store.
//! - **[`service`]**: the lifecycle operations.

pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::response::{ContactResponse, ContactResponseWrapper};
pub use crate::core::types::{Contact, ContactFields, ContactId};
pub use crate::error::{ContactError, ErrorKind};
pub use crate::service::ContactService;
