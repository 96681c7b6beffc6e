//! Contact lifecycle: create, read, update, delete and photo association.
//!
//! [`ContactService`] owns no records itself. Every operation reads from the
//! [`ContactStore`], works on a transient copy and writes it back.

use tracing::{debug, info, warn};

use crate::core::photo_name::file_name_of_url;
use crate::core::response::ContactResponseWrapper;
use crate::core::types::{Contact, ContactFields, ContactId};
use crate::error::{ContactError, Result};
use crate::io::contact_store::ContactStore;
use crate::io::photo_store::PhotoStore;

/// Success indicator returned by [`ContactService::delete`].
pub const DELETE_SUCCESS: &str = "delete success";

pub struct ContactService<S, P> {
    store: S,
    photos: P,
}

impl<S: ContactStore, P: PhotoStore> ContactService<S, P> {
    pub fn new(store: S, photos: P) -> Self {
        Self { store, photos }
    }

    pub fn photos(&self) -> &P {
        &self.photos
    }

    pub fn create(&self, fields: ContactFields) -> Result<ContactResponseWrapper> {
        let saved = self.store.save(Contact::from_fields(fields))?;
        let id = saved
            .id
            .ok_or_else(|| ContactError::persistence("store returned contact without id"))?;
        info!(id = %id, "contact created");
        Ok(ContactResponseWrapper::single(&saved))
    }

    pub fn get(&self, id: ContactId) -> Result<ContactResponseWrapper> {
        let contact = self.fetch(id)?;
        Ok(ContactResponseWrapper::single(&contact))
    }

    pub fn get_all(&self) -> Result<ContactResponseWrapper> {
        let contacts = self.store.find_all()?;
        debug!(count = contacts.len(), "contacts listed");
        Ok(ContactResponseWrapper::from_contacts(&contacts))
    }

    /// Overwrite the six editable fields. `photo_url` is carried over.
    pub fn update(&self, id: ContactId, fields: ContactFields) -> Result<ContactResponseWrapper> {
        let mut contact = self.fetch(id)?;
        contact.apply_fields(fields);
        let saved = self.store.save(contact)?;
        info!(id = %id, "contact updated");
        Ok(ContactResponseWrapper::single(&saved))
    }

    pub fn delete(&self, id: ContactId) -> Result<&'static str> {
        self.fetch(id)?;
        if !self.store.delete_by_id(id)? {
            return Err(ContactError::not_found(id));
        }
        // The record is gone either way; a leftover file is only logged.
        if let Err(err) = self.photos.remove(id) {
            warn!(id = %id, error = %err, "failed to remove photo for deleted contact");
        }
        info!(id = %id, "contact deleted");
        Ok(DELETE_SUCCESS)
    }

    /// Store the photo, record its URL, then drop older photos for the
    /// contact. A failed write or save leaves the record and the file it
    /// points at as they were.
    pub fn upload_photo(
        &self,
        id: ContactId,
        bytes: &[u8],
        original_name: Option<&str>,
    ) -> Result<String> {
        let mut contact = self.fetch(id)?;
        let previous = contact
            .photo_url
            .as_deref()
            .and_then(file_name_of_url)
            .map(str::to_owned);

        let stored = self.photos.store(id, bytes, original_name)?;
        contact.photo_url = Some(stored.url.clone());
        if let Err(err) = self.store.save(contact) {
            if let Err(cleanup) = self.photos.prune(id, previous.as_deref()) {
                warn!(id = %id, error = %cleanup, "failed to discard photo after save failure");
            }
            return Err(err);
        }

        if let Err(err) = self.photos.prune(id, Some(&stored.file_name)) {
            warn!(id = %id, error = %err, "failed to remove replaced photo");
        }
        info!(id = %id, photo_url = %stored.url, "contact photo uploaded");
        Ok(stored.url)
    }

    fn fetch(&self, id: ContactId) -> Result<Contact> {
        debug!(id = %id, "loading contact");
        self.store
            .find_by_id(id)?
            .ok_or_else(|| ContactError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::error::ErrorKind;
    use crate::io::contact_store::SqliteContactStore;
    use crate::io::photo_store::FsPhotoStore;
    use crate::test_support::{TestService, ann_fields, fields};

    /// SQLite store whose saves can be switched to fail.
    struct FlakyStore {
        inner: SqliteContactStore,
        fail_saves: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: SqliteContactStore::in_memory().expect("store"),
                fail_saves: AtomicBool::new(false),
            }
        }
    }

    impl ContactStore for FlakyStore {
        fn save(&self, contact: Contact) -> Result<Contact> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(ContactError::persistence("db down"));
            }
            self.inner.save(contact)
        }

        fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>> {
            self.inner.find_by_id(id)
        }

        fn find_all(&self) -> Result<Vec<Contact>> {
            self.inner.find_all()
        }

        fn delete_by_id(&self, id: ContactId) -> Result<bool> {
            self.inner.delete_by_id(id)
        }
    }

    fn flaky_service(photo_dir: &Path) -> ContactService<FlakyStore, FsPhotoStore> {
        ContactService::new(FlakyStore::new(), FsPhotoStore::new(photo_dir, ""))
    }

    #[test]
    fn create_copies_fields_and_assigns_id() {
        let t = TestService::new().expect("service");
        let created = t.service.create(ann_fields()).expect("create");
        let response = &created.contacts[0];
        assert_eq!(response.id, Some(1));
        assert_eq!(response.name.as_deref(), Some("Ann"));
        assert_eq!(response.email.as_deref(), Some("a@x.com"));
        assert_eq!(response.photo_url, None);
    }

    #[test]
    fn get_missing_is_not_found() {
        let t = TestService::new().expect("service");
        let err = t.service.get(ContactId(5)).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "contact not found with id 5");
    }

    #[test]
    fn get_all_on_empty_store_is_empty() {
        let t = TestService::new().expect("service");
        let all = t.service.get_all().expect("get all");
        assert!(all.contacts.is_empty());
    }

    #[test]
    fn update_replaces_editable_fields_and_keeps_photo() {
        let t = TestService::new().expect("service");
        t.service.create(ann_fields()).expect("create");
        let url = t
            .service
            .upload_photo(ContactId(1), b"img", Some("a.jpg"))
            .expect("upload");

        let updated = t
            .service
            .update(
                ContactId(1),
                fields("Anna", "anna@x.com", "CTO", "555-0100", "1 Main St", "Active"),
            )
            .expect("update");

        let response = &updated.contacts[0];
        assert_eq!(response.id, Some(1));
        assert_eq!(response.name.as_deref(), Some("Anna"));
        assert_eq!(response.title.as_deref(), Some("CTO"));
        assert_eq!(response.status.as_deref(), Some("Active"));
        assert_eq!(response.photo_url.as_deref(), Some(url.as_str()));
    }

    #[test]
    fn update_missing_is_not_found() {
        let t = TestService::new().expect("service");
        let err = t
            .service
            .update(ContactId(3), ann_fields())
            .expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn delete_removes_record_and_photo() {
        let t = TestService::new().expect("service");
        t.service.create(ann_fields()).expect("create");
        t.service
            .upload_photo(ContactId(1), b"img", Some("a.jpg"))
            .expect("upload");
        assert!(t.photo_dir().join("1.jpg").exists());

        assert_eq!(t.service.delete(ContactId(1)).expect("delete"), DELETE_SUCCESS);
        assert!(!t.photo_dir().join("1.jpg").exists());
        let err = t.service.get(ContactId(1)).expect_err("deleted");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = t.service.delete(ContactId(1)).expect_err("second delete");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn upload_sets_photo_url_by_extension() {
        let t = TestService::new().expect("service");
        t.service.create(ann_fields()).expect("create");

        let url = t
            .service
            .upload_photo(ContactId(1), b"img", Some("a.jpg"))
            .expect("upload jpg");
        assert!(url.ends_with("/contacts/image/1.jpg"));

        let url = t
            .service
            .upload_photo(ContactId(1), b"img", Some("noext"))
            .expect("upload noext");
        assert!(url.ends_with("/contacts/image/1.png"));

        let stored = t.service.get(ContactId(1)).expect("get");
        assert_eq!(stored.contacts[0].photo_url.as_deref(), Some(url.as_str()));
        assert_eq!(stored.contacts[0].name.as_deref(), Some("Ann"));
        assert_eq!(stored.contacts[0].email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn upload_for_missing_contact_writes_nothing() {
        let t = TestService::new().expect("service");
        let err = t
            .service
            .upload_photo(ContactId(9), b"img", Some("a.jpg"))
            .expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!t.photo_dir().join("9.jpg").exists());
    }

    #[test]
    fn failed_upload_leaves_record_unchanged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("photos");
        fs::write(&blocker, b"not a directory").expect("seed");
        let service = ContactService::new(
            SqliteContactStore::in_memory().expect("store"),
            FsPhotoStore::new(&blocker, ""),
        );
        service.create(ann_fields()).expect("create");

        let err = service
            .upload_photo(ContactId(1), b"img", Some("a.jpg"))
            .expect_err("upload should fail");
        assert_eq!(err.kind(), ErrorKind::UploadFailure);

        let stored = service.get(ContactId(1)).expect("get");
        assert_eq!(stored.contacts[0].photo_url, None);
    }

    /// A save failure after the write keeps the old photo and drops the new one.
    #[test]
    fn failed_save_keeps_previous_photo() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = flaky_service(temp.path());
        service.create(ann_fields()).expect("create");
        service
            .upload_photo(ContactId(1), b"old", Some("a.jpg"))
            .expect("first upload");

        service.store.fail_saves.store(true, Ordering::SeqCst);
        let err = service
            .upload_photo(ContactId(1), b"new", Some("b.png"))
            .expect_err("save should fail");
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);

        let stored = service.get(ContactId(1)).expect("get");
        assert_eq!(
            stored.contacts[0].photo_url.as_deref(),
            Some("/contacts/image/1.jpg")
        );
        assert_eq!(fs::read(temp.path().join("1.jpg")).expect("old photo"), b"old");
        assert!(!temp.path().join("1.png").exists());
    }

    #[test]
    fn failed_save_without_previous_photo_leaves_no_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = flaky_service(temp.path());
        service.create(ann_fields()).expect("create");

        service.store.fail_saves.store(true, Ordering::SeqCst);
        service
            .upload_photo(ContactId(1), b"new", Some("b.png"))
            .expect_err("save should fail");

        assert!(!temp.path().join("1.png").exists());
        let stored = service.get(ContactId(1)).expect("get");
        assert_eq!(stored.contacts[0].photo_url, None);
    }

    #[test]
    fn reupload_with_new_extension_removes_old_file() {
        let t = TestService::new().expect("service");
        t.service.create(ann_fields()).expect("create");
        t.service
            .upload_photo(ContactId(1), b"a", Some("a.jpg"))
            .expect("jpg");
        t.service
            .upload_photo(ContactId(1), b"b", Some("b.gif"))
            .expect("gif");
        assert_eq!(t.photo_files(), vec!["1.gif"]);
    }
}
