//! Contact persistence: the [`ContactStore`] seam and its SQLite backing.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::core::types::{Contact, ContactId};
use crate::error::{ContactError, Result};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS contact (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT,
    title TEXT,
    phone TEXT,
    address TEXT,
    status TEXT,
    photo_url TEXT
);
"#;

const SELECT_COLUMNS: &str = "id, name, email, title, phone, address, status, photo_url";

/// Durable mapping from contact id to contact record.
pub trait ContactStore: Send + Sync {
    /// Insert when `contact.id` is `None` (the store assigns the id),
    /// otherwise overwrite the row with that id. Returns the saved record.
    fn save(&self, contact: Contact) -> Result<Contact>;

    fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>>;

    /// All records in id order.
    fn find_all(&self) -> Result<Vec<Contact>>;

    /// Returns `false` when no row had that id.
    fn delete_by_id(&self, id: ContactId) -> Result<bool>;
}

/// SQLite-backed contact store. One connection, serialized by a mutex.
pub struct SqliteContactStore {
    conn: Mutex<Connection>,
}

impl SqliteContactStore {
    /// Open (creating if needed) the database file and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ContactError::persistence_with_source(
                    format!("create database directory {}", parent.display()),
                    e,
                )
            })?;
        }
        let conn = Connection::open(path).map_err(|e| {
            ContactError::persistence_with_source(format!("open database {}", path.display()), e)
        })?;
        Self::apply_schema(&conn)?;
        debug!(path = %path.display(), "contact store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fresh in-memory database; contents vanish with the store.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ContactError::persistence_with_source("open in-memory database", e))?;
        Self::apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn apply_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| ContactError::persistence_with_source("apply contact schema", e))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ContactError::persistence("contact store connection poisoned"))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: Some(ContactId(row.get(0)?)),
            name: row.get(1)?,
            email: row.get(2)?,
            title: row.get(3)?,
            phone: row.get(4)?,
            address: row.get(5)?,
            status: row.get(6)?,
            photo_url: row.get(7)?,
        })
    }
}

impl ContactStore for SqliteContactStore {
    fn save(&self, mut contact: Contact) -> Result<Contact> {
        let conn = self.lock()?;
        match contact.id {
            None => {
                conn.execute(
                    "INSERT INTO contact (name, email, title, phone, address, status, photo_url)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        contact.name,
                        contact.email,
                        contact.title,
                        contact.phone,
                        contact.address,
                        contact.status,
                        contact.photo_url,
                    ],
                )
                .map_err(|e| ContactError::persistence_with_source("insert contact", e))?;
                contact.id = Some(ContactId(conn.last_insert_rowid()));
            }
            Some(id) => {
                conn.execute(
                    "INSERT INTO contact (id, name, email, title, phone, address, status, photo_url)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        email = excluded.email,
                        title = excluded.title,
                        phone = excluded.phone,
                        address = excluded.address,
                        status = excluded.status,
                        photo_url = excluded.photo_url",
                    params![
                        id.0,
                        contact.name,
                        contact.email,
                        contact.title,
                        contact.phone,
                        contact.address,
                        contact.status,
                        contact.photo_url,
                    ],
                )
                .map_err(|e| {
                    ContactError::persistence_with_source(format!("save contact {id}"), e)
                })?;
            }
        }
        debug!(id = ?contact.id, "contact saved");
        Ok(contact)
    }

    fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM contact WHERE id = ?1"),
            params![id.0],
            Self::map_row,
        )
        .optional()
        .map_err(|e| ContactError::persistence_with_source(format!("load contact {id}"), e))
    }

    fn find_all(&self) -> Result<Vec<Contact>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM contact ORDER BY id ASC"))
            .map_err(|e| ContactError::persistence_with_source("prepare contact listing", e))?;
        let rows = stmt
            .query_map([], Self::map_row)
            .map_err(|e| ContactError::persistence_with_source("list contacts", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ContactError::persistence_with_source("read contact row", e))
    }

    fn delete_by_id(&self, id: ContactId) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM contact WHERE id = ?1", params![id.0])
            .map_err(|e| {
                ContactError::persistence_with_source(format!("delete contact {id}"), e)
            })?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Contact {
        Contact {
            name: Some(name.to_string()),
            ..Contact::default()
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = SqliteContactStore::in_memory().expect("store");
        let a = store.save(named("a")).expect("save a");
        let b = store.save(named("b")).expect("save b");
        assert_eq!(a.id, Some(ContactId(1)));
        assert_eq!(b.id, Some(ContactId(2)));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = SqliteContactStore::in_memory().expect("store");
        let a = store.save(named("a")).expect("save a");
        let a_id = a.id.expect("id");
        assert!(store.delete_by_id(a_id).expect("delete"));
        let b = store.save(named("b")).expect("save b");
        assert_ne!(b.id, Some(a_id));
    }

    #[test]
    fn save_with_id_overwrites_row() {
        let store = SqliteContactStore::in_memory().expect("store");
        let mut saved = store.save(named("a")).expect("save");
        saved.email = Some("a@x.com".to_string());
        saved.photo_url = Some("/contacts/image/1.png".to_string());
        store.save(saved.clone()).expect("overwrite");

        let all = store.find_all().expect("find all");
        assert_eq!(all, vec![saved]);
    }

    #[test]
    fn find_missing_returns_none() {
        let store = SqliteContactStore::in_memory().expect("store");
        assert_eq!(store.find_by_id(ContactId(42)).expect("find"), None);
        assert!(!store.delete_by_id(ContactId(42)).expect("delete"));
    }

    #[test]
    fn find_all_orders_by_id() {
        let store = SqliteContactStore::in_memory().expect("store");
        for name in ["c", "a", "b"] {
            store.save(named(name)).expect("save");
        }
        let names: Vec<_> = store
            .find_all()
            .expect("find all")
            .into_iter()
            .map(|c| c.name.expect("name"))
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn open_creates_parent_directory_and_persists() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("contacts.db");
        {
            let store = SqliteContactStore::open(&path).expect("open");
            store.save(named("a")).expect("save");
        }
        let reopened = SqliteContactStore::open(&path).expect("reopen");
        let found = reopened.find_by_id(ContactId(1)).expect("find");
        assert_eq!(found.and_then(|c| c.name).as_deref(), Some("a"));
    }
}
