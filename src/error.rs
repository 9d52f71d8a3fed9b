//! Crate-wide error taxonomy
//!
//! Four failure families cross the protocol boundary: invalid arguments,
//! unresolvable collections/members/media, failed authorization checks, and
//! wrapped failures from the underlying resource-graph store. Authorization
//! failures stay distinct from not-found on the AtomPub surface; the ORE
//! surface collapses an unauthorized root into not-found before returning.

use crate::resource::ResourceId;
use crate::store::Permission;
use thiserror::Error;

/// Failure reported by an external collaborator (resource graph or content
/// store), carrying the collaborator's own detail message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors surfaced by the AtomPub adapters and the ORE pipeline
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{permission} denied on resource {resource}")]
    Unauthorized {
        permission: Permission,
        resource: ResourceId,
    },

    #[error("principal '{0}' has no create permission")]
    CreateDenied(String),

    #[error("containment cycle detected at resource {0}")]
    CycleDetected(ResourceId),

    #[error("underlying store failure: {0}")]
    Store(#[from] StoreError),

    #[error("media transfer failed: {0}")]
    Media(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialize(String),
}

impl RepositoryError {
    /// Shorthand for the argument-validation failures the adapters raise on
    /// null/empty/negative required inputs.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        RepositoryError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(permission: Permission, resource: ResourceId) -> Self {
        RepositoryError::Unauthorized {
            permission,
            resource,
        }
    }

    /// True when this error should surface as a protocol-level 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
