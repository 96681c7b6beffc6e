//! External response shapes for contact records.

use serde::{Deserialize, Serialize};

use crate::core::types::Contact;

/// Client-facing view of a contact record. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.map(|id| id.0),
            name: contact.name.clone(),
            email: contact.email.clone(),
            title: contact.title.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            status: contact.status.clone(),
            photo_url: contact.photo_url.clone(),
        }
    }
}

/// Named collection wrapper used for every contact payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponseWrapper {
    pub contacts: Vec<ContactResponse>,
}

impl ContactResponseWrapper {
    pub fn single(contact: &Contact) -> Self {
        Self {
            contacts: vec![ContactResponse::from(contact)],
        }
    }

    pub fn from_contacts(contacts: &[Contact]) -> Self {
        Self {
            contacts: contacts.iter().map(ContactResponse::from).collect(),
        }
    }
}
