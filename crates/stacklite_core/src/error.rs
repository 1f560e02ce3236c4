//! Operation-boundary error taxonomy.
//!
//! Malformed persisted data never appears here; it is recovered at the
//! store read boundary. Everything else is reported and contained at the
//! operation that raised it; no error is fatal to the process.

use crate::access::PermissionDenied;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ForumResult<T> = Result<T, ForumError>;

#[derive(Debug)]
pub enum ForumError {
    /// Capability gate rejected the action; no partial state change.
    PermissionDenied(PermissionDenied),
    /// Required field missing or out of bounds; operation not attempted.
    Validation(String),
    /// Referenced entity id absent after reconciliation.
    NotFound(String),
    /// Persistence failure below the operation.
    Store(StoreError),
}

impl Display for ForumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(err) => write!(f, "{err}"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ForumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Validation(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<PermissionDenied> for ForumError {
    fn from(value: PermissionDenied) -> Self {
        Self::PermissionDenied(value)
    }
}

impl From<StoreError> for ForumError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
