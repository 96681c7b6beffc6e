//! Shared application state for the contacts server.

use std::sync::Arc;

use contacts::ContactService;
use contacts::io::contact_store::SqliteContactStore;
use contacts::io::photo_store::FsPhotoStore;

pub type Service = ContactService<SqliteContactStore, FsPhotoStore>;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

impl AppState {
    pub fn new(service: Service) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
