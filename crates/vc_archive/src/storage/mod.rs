//! Where saved documents go.
//!
//! A save slot is addressed by a category (e.g. `Level`) and a name (e.g.
//! the level name). Backends store opaque bytes; [`Compression`] runs on
//! the bytes before they reach the backend.

use alloc::string::String;
use alloc::vec::Vec;

use crate::StorageError;

// -----------------------------------------------------------------------------
// Modules

mod file;
mod memory;

// -----------------------------------------------------------------------------
// Exports

pub use file::FileStorage;
pub use memory::MemoryStorage;

// -----------------------------------------------------------------------------
// SaveStorage

/// A backend holding save slots.
pub trait SaveStorage {
    /// Reads a slot, `None` if it was never written.
    fn load(&self, category: &str, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Writes a slot, replacing any previous content.
    fn save(&mut self, category: &str, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Removes a slot, returning `false` if it did not exist.
    fn remove(&mut self, category: &str, name: &str) -> Result<bool, StorageError>;

    /// Names of the slots in a category, sorted.
    fn list(&self, category: &str) -> Result<Vec<String>, StorageError>;

    fn contains(&self, category: &str, name: &str) -> Result<bool, StorageError> {
        Ok(self.load(category, name)?.is_some())
    }
}

/// Slot names and categories become path segments.
pub(crate) fn check_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', ':', '\0']);
    if invalid {
        return Err(StorageError::InvalidName(name.into()));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Compression

/// A reversible transform over the bytes of a save.
pub trait Compression: Send + Sync {
    fn compress(&self, bytes: Vec<u8>) -> Result<Vec<u8>, StorageError>;

    fn decompress(&self, bytes: Vec<u8>) -> Result<Vec<u8>, StorageError>;
}

/// Stores bytes as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncompressed;

impl Compression for Uncompressed {
    #[inline]
    fn compress(&self, bytes: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        Ok(bytes)
    }

    #[inline]
    fn decompress(&self, bytes: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        Ok(bytes)
    }
}
