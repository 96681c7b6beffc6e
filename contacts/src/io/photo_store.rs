//! Filesystem-backed contact photos.
//!
//! Each contact has at most one file, `<id><ext>`, under the configured
//! directory. Concurrent uploads for the same id are not coordinated; the
//! last rename wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::photo_name::{is_photo_of, photo_file_name, photo_url};
use crate::core::types::ContactId;
use crate::error::{ContactError, Result};

/// A photo written by [`PhotoStore::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// `<id><ext>` name inside the photo directory.
    pub file_name: String,
    /// Public URL for the record's `photo_url`.
    pub url: String,
}

/// Storage for contact photos.
pub trait PhotoStore: Send + Sync {
    /// Write `bytes` as the photo for `id`. Other photos for `id` are left in
    /// place until [`PhotoStore::prune`] runs.
    fn store(
        &self,
        id: ContactId,
        bytes: &[u8],
        original_name: Option<&str>,
    ) -> Result<StoredPhoto>;

    /// Remove every photo for `id` except `keep`. Missing files are not an error.
    fn prune(&self, id: ContactId, keep: Option<&str>) -> Result<()>;

    /// Remove every stored photo for `id`.
    fn remove(&self, id: ContactId) -> Result<()> {
        self.prune(id, None)
    }
}

pub struct FsPhotoStore {
    directory: PathBuf,
    public_base_url: String,
}

impl FsPhotoStore {
    pub fn new(directory: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Photo files for `id` other than `keep`.
    fn stale_photos(&self, id: ContactId, keep: Option<&str>) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut stale = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if is_photo_of(id, &name) && keep != Some(name.as_str()) {
                stale.push(entry.path());
            }
        }
        Ok(stale)
    }
}

impl PhotoStore for FsPhotoStore {
    fn store(
        &self,
        id: ContactId,
        bytes: &[u8],
        original_name: Option<&str>,
    ) -> Result<StoredPhoto> {
        let file_name = photo_file_name(id, original_name);
        fs::create_dir_all(&self.directory).map_err(|e| {
            ContactError::upload_with_source(
                format!("create photo directory {}", self.directory.display()),
                e,
            )
        })?;

        let target = self.directory.join(&file_name);
        let tmp_path = self.directory.join(format!(".{file_name}.tmp"));
        fs::write(&tmp_path, bytes).map_err(|e| {
            ContactError::upload_with_source(format!("write {}", tmp_path.display()), e)
        })?;
        if let Err(e) = fs::rename(&tmp_path, &target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ContactError::upload_with_source(
                format!("replace {}", target.display()),
                e,
            ));
        }

        debug!(id = %id, path = %target.display(), bytes = bytes.len(), "photo stored");
        let url = photo_url(&self.public_base_url, &file_name);
        Ok(StoredPhoto { file_name, url })
    }

    fn prune(&self, id: ContactId, keep: Option<&str>) -> Result<()> {
        let stale = self.stale_photos(id, keep).map_err(|e| {
            ContactError::upload_with_source(
                format!("scan photo directory {}", self.directory.display()),
                e,
            )
        })?;
        for path in stale {
            match fs::remove_file(&path) {
                Ok(()) => debug!(id = %id, path = %path.display(), "photo removed"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(ContactError::upload_with_source(
                        format!("remove {}", path.display()),
                        err,
                    ));
                }
            }
        }
        Ok(())
    }
}
