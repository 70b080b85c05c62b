//! # Repository & Store Contracts
//!
//! The two seams to the registry's external collaborators: the
//! persistence engine holding image records, and the key/value blob
//! backend holding payload bytes. The core consumes both through narrow
//! traits; conflict detection, status transition enforcement, and
//! protected-record rules live behind the repository.

use gallery_core::{Image, ImageDelta, ImageId, RegistryError, RequestContext};

use crate::filter::FilterSet;

/// Persistence contract for image records.
///
/// `list` returns the records visible to the caller, including
/// soft-deleted ones (the default filter set excludes those). Filters are
/// passed through verbatim; implementations may pre-filter, and the
/// pagination engine re-applies every predicate, so partial filtering is
/// never incorrect.
pub trait ImageRepository: Send + Sync {
    /// Caller-visible records, filters passed through verbatim.
    fn list(&self, ctx: &RequestContext, filters: &FilterSet) -> Result<Vec<Image>, RegistryError>;

    /// A single live record. `NotFound` covers both absent records and
    /// records the caller may not see.
    fn get(&self, ctx: &RequestContext, id: &ImageId) -> Result<Image, RegistryError>;

    /// Persist a new record. Stamps id (when the client supplied none),
    /// owner, status, and timestamps server-side; a client-supplied id
    /// that collides is a `Conflict`.
    fn create(&self, ctx: &RequestContext, delta: ImageDelta) -> Result<Image, RegistryError>;

    /// Apply a validated delta to a live record.
    fn update(
        &self,
        ctx: &RequestContext,
        id: &ImageId,
        delta: ImageDelta,
    ) -> Result<Image, RegistryError>;

    /// Mark a record deleted, keeping it for audit queries. Protected
    /// records are refused with `Forbidden`.
    fn soft_delete(&self, ctx: &RequestContext, id: &ImageId) -> Result<(), RegistryError>;
}

/// Byte-store contract. Only the delete operation is consumed by this
/// core, during record deletion: bytes must be gone before the record
/// flips to deleted, or a stale locator could survive a partial failure.
pub trait ImageStore: Send + Sync {
    /// Remove the bytes at a locator. `NotFound` when nothing is stored
    /// there.
    fn delete(&self, ctx: &RequestContext, locator: &str) -> Result<(), RegistryError>;
}
