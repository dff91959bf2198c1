use alloc::string::String;

use thiserror::Error;
use vc_reflect::TypeHandle;

use crate::codec::EncodeError;

/// A root could not be added to a [`GraphSerializer`](super::GraphSerializer).
///
/// Nothing of a failed `add_*` call should be relied upon; discard the
/// serializer instead of calling `finish`.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializeError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Root field `{0}` uses the reserved `__` prefix")]
    ReservedField(String),

    #[error("Type {0} is not a registered struct")]
    NotAStruct(TypeHandle),
}
