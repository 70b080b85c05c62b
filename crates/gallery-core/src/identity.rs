//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the registry. These prevent
//! accidental identifier confusion — an `ImageId` can never be passed
//! where a `TenantId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RegistryError;

/// Unique identifier for an image record.
///
/// Identifiers are UUIDs. Client-supplied identifiers must be
/// syntactically valid; server-generated ones use random v4 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub Uuid);

impl ImageId {
    /// Generate a new random image identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BadRequest`] when the string is not a
    /// syntactically valid UUID.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| RegistryError::bad_request(format!("'{s}' is not a valid image id")))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque tenant identifier, taken from the caller context.
///
/// Never client-writable: the owner of a record is stamped server-side
/// at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    /// Wrap a raw tenant string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
