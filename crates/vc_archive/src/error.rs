use alloc::string::String;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vc_object::ObjectError;
use vc_reflect::ObjectId;
use vc_serializer::{DeserializeError, DocumentError, SerializeError};

// -----------------------------------------------------------------------------
// StorageError

/// An error from a [`SaveStorage`](crate::SaveStorage) backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("Invalid save slot name `{0}`")]
    InvalidName(String),

    #[error("I/O error at `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Compression failed: {0}")]
    Compression(String),
}

impl StorageError {
    #[inline]
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// -----------------------------------------------------------------------------
// ArchiveError

/// An error from [`SaveManager`](crate::SaveManager).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Deserialize(#[from] DeserializeError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error("Object {0:?} is not a level")]
    NotALevel(ObjectId),
}
