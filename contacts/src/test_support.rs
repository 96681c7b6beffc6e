//! Test-only helpers for building services and contact payloads.

use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use crate::core::types::ContactFields;
use crate::io::contact_store::SqliteContactStore;
use crate::io::photo_store::FsPhotoStore;
use crate::service::ContactService;

pub type SqliteService = ContactService<SqliteContactStore, FsPhotoStore>;

/// Service over an in-memory database and a scratch photo directory.
///
/// The directory lives as long as this value.
pub struct TestService {
    pub service: SqliteService,
    temp: TempDir,
}

impl TestService {
    pub fn new() -> Result<Self> {
        Self::with_base_url("")
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let temp = tempfile::tempdir()?;
        let photos = FsPhotoStore::new(temp.path().join("photos"), base_url);
        let service = ContactService::new(SqliteContactStore::in_memory()?, photos);
        Ok(Self { service, temp })
    }

    pub fn photo_dir(&self) -> PathBuf {
        self.temp.path().join("photos")
    }

    /// Photo file names currently on disk, sorted.
    pub fn photo_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.photo_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// `{name: "Ann", email: "a@x.com"}` with every other field unset.
pub fn ann_fields() -> ContactFields {
    ContactFields {
        name: Some("Ann".to_string()),
        email: Some("a@x.com".to_string()),
        ..ContactFields::default()
    }
}

/// Fully populated payload.
pub fn fields(
    name: &str,
    email: &str,
    title: &str,
    phone: &str,
    address: &str,
    status: &str,
) -> ContactFields {
    ContactFields {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        title: Some(title.to_string()),
        phone: Some(phone.to_string()),
        address: Some(address.to_string()),
        status: Some(status.to_string()),
    }
}
