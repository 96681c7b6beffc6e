//! Error taxonomy for contact operations.
//!
//! Callers need to tell a missing contact apart from a store outage or a
//! failed photo write, so the three causes stay distinct all the way out.

use thiserror::Error;

use crate::core::types::ContactId;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact not found with id {id}")]
    NotFound { id: ContactId },

    #[error("persistence failure: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("upload failed: {message}")]
    Upload {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

/// Stable, machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PersistenceFailure,
    UploadFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PersistenceFailure => "persistence_failure",
            Self::UploadFailure => "upload_failure",
        }
    }
}

impl ContactError {
    pub fn not_found(id: ContactId) -> Self {
        Self::NotFound { id }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            source: None,
        }
    }

    pub fn persistence_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Persistence {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn upload_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Upload {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Persistence { .. } => ErrorKind::PersistenceFailure,
            Self::Upload { .. } => ErrorKind::UploadFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
