//! Level and player save slots on top of `vc_serializer`.
//!
//! [`SaveManager`] decides what to save and when: the saveable actors of a
//! level, or a player's pawn. Documents are handed to a [`SaveStorage`]
//! backend as bytes.

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod manager;

pub mod storage;


// -----------------------------------------------------------------------------
// Exports

pub use config::ArchiveConfig;
pub use error::{ArchiveError, StorageError};
pub use manager::{LEVEL_ACTORS, LevelFn, LevelLoad, PLAYER_PAWN, SaveManager, serializable_actors};
pub use storage::{Compression, FileStorage, MemoryStorage, SaveStorage, Uncompressed};
