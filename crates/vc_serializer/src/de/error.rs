use alloc::string::String;
use core::fmt;

use thiserror::Error;
use vc_reflect::TypeHandle;

use crate::codec::DecodeError;

// -----------------------------------------------------------------------------
// Phase

/// Progress of a [`GraphDeserializer`](super::GraphDeserializer).
///
/// Each variant names the last completed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Created,
    ExternalsLoaded,
    Instanced,
    DataLoaded,
    ConstructionFinished,
    NotifiesReplayed,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Created => "Created",
            Self::ExternalsLoaded => "ExternalsLoaded",
            Self::Instanced => "Instanced",
            Self::DataLoaded => "DataLoaded",
            Self::ConstructionFinished => "ConstructionFinished",
            Self::NotifiesReplayed => "NotifiesReplayed",
            Self::Finished => "Finished",
        })
    }
}

// -----------------------------------------------------------------------------
// DeserializeError

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DeserializeError {
    #[error("Phase called out of order: expected {expected}, currently {actual}")]
    PhaseOrder { expected: Phase, actual: Phase },

    #[error("The document has no root field `{0}`")]
    MissingRoot(String),

    #[error("Root field `{0}` does not hold the expected value")]
    InvalidRoot(String),

    #[error("Type {0} is not a registered struct")]
    NotAStruct(TypeHandle),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
