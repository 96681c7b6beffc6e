//! Contact record types shared by the store, photo store and service.
//!
//! These types carry no I/O. The store assigns identifiers; everything else
//! is copied verbatim from client payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted contact record.
///
/// `id` is `None` only before the first save. `photo_url` is set exclusively
/// by the photo upload path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub id: Option<ContactId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub photo_url: Option<String>,
}

/// Client-editable contact fields (create and update payload).
///
/// Unknown keys such as `id` or `photoUrl` are ignored on deserialization, so
/// clients cannot assign identifiers or photo URLs through this path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}

impl Contact {
    /// Build an unsaved record from client fields.
    pub fn from_fields(fields: ContactFields) -> Self {
        let mut contact = Contact::default();
        contact.apply_fields(fields);
        contact
    }

    /// Overwrite every editable field. `id` and `photo_url` are untouched.
    pub fn apply_fields(&mut self, fields: ContactFields) {
        let ContactFields {
            name,
            email,
            title,
            phone,
            address,
            status,
        } = fields;
        self.name = name;
        self.email = email;
        self.title = title;
        self.phone = phone;
        self.address = address;
        self.status = status;
    }
}
