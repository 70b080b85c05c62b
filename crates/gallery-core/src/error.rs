//! # Error Kinds
//!
//! The shared error vocabulary for the registry. Every detected violation
//! is terminal for the current request; there are no retries. Transient
//! failures inside external collaborators (repository, byte store) are
//! those collaborators' responsibility to classify before they surface
//! here.

use thiserror::Error;

/// Deterministic request-level errors, surfaced directly to the caller.
///
/// The API layer maps these onto HTTP statuses one-to-one:
/// 400, 403, 404 and 409 respectively.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed or unsupported input: a bad limit, an unknown sort key or
    /// direction, an unresolvable pagination marker, a schema violation,
    /// or a filter value of the wrong type.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A read-only field was supplied, a policy rule denied the action,
    /// or a protected record was targeted for deletion.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The referenced record does not exist or is not visible to the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// A client-supplied identifier collides with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl RegistryError {
    /// Shorthand constructor for [`RegistryError::BadRequest`].
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Shorthand constructor for [`RegistryError::Forbidden`].
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Shorthand constructor for [`RegistryError::NotFound`].
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_kind_and_message() {
        let err = RegistryError::bad_request("limit must be an integer");
        assert_eq!(err.to_string(), "bad request: limit must be an integer");

        let err = RegistryError::forbidden("attribute 'status' is read-only");
        assert!(err.to_string().starts_with("forbidden:"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        assert_ne!(
            RegistryError::not_found("x"),
            RegistryError::bad_request("x")
        );
    }
}
