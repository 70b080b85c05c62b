//! # Image Data Model
//!
//! The managed entity of the registry: an immutable binary artifact's
//! metadata record. Payload bytes live in an external store; this record
//! only carries the locator.
//!
//! ## Status Lifecycle
//!
//! ```text
//! queued ──▶ saving ──▶ active
//!    │
//!    ├──▶ killed                       (terminal)
//!    └──▶ pending_delete ──▶ deleted   (soft-delete branch)
//! ```
//!
//! The core never forges a status from client input: status transitions
//! are owned by the repository, and bodies carrying `status` are rejected
//! before they reach the data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RequestContext;
use crate::identity::{ImageId, TenantId};
use crate::temporal::Timestamp;

/// Lifecycle status of an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    /// Record exists, no bytes uploaded yet.
    Queued,
    /// Bytes are being written to the external store.
    Saving,
    /// Bytes present and usable.
    Active,
    /// Upload failed; record kept for diagnosis (terminal).
    Killed,
    /// Soft delete requested, bytes not yet removed.
    PendingDelete,
    /// Soft-deleted (terminal).
    Deleted,
}

impl ImageStatus {
    /// The wire-format string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Saving => "saving",
            Self::Active => "active",
            Self::Killed => "killed",
            Self::PendingDelete => "pending_delete",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image metadata record.
///
/// `properties` is the dynamic attribute bag: custom typed properties and
/// free-form additional properties, flattened to top-level keys on the
/// wire. Property names never collide with fixed-field names; the
/// deserializer routes fixed fields before anything reaches the bag, and
/// bag values are always scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Unique identifier, immutable once set.
    pub id: ImageId,
    /// Human-readable name.
    pub name: Option<String>,
    /// Lifecycle status, owned by the repository.
    pub status: ImageStatus,
    /// Whether the record is visible to every tenant.
    pub is_public: bool,
    /// Owning tenant, stamped from the caller context at creation.
    pub owner: Option<TenantId>,
    /// Tag set; duplicates collapsed, insertion order preserved.
    pub tags: Vec<String>,
    /// Payload size in bytes, known once bytes exist.
    pub size: Option<u64>,
    /// Payload checksum, set by the byte store.
    pub checksum: Option<String>,
    /// On-disk payload format.
    pub disk_format: Option<String>,
    /// Container wrapping of the payload.
    pub container_format: Option<String>,
    /// Minimum RAM (MB) required to use the image.
    pub min_ram: Option<u64>,
    /// Minimum disk (GB) required to use the image.
    pub min_disk: Option<u64>,
    /// Protected records cannot be deleted.
    pub protected: bool,
    /// Opaque store locator; null until bytes exist.
    pub location: Option<String>,
    /// Dynamic property bag (scalar values only).
    pub properties: BTreeMap<String, Value>,
    /// Server-assigned creation time.
    pub created_at: Timestamp,
    /// Server-assigned last-modification time.
    pub updated_at: Timestamp,
    /// Soft-delete flag, set by the repository.
    pub deleted: bool,
    /// When the record was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

impl Image {
    /// Build a fresh record from a validated create payload.
    ///
    /// Server-side stamping: id generated when the client supplied none,
    /// owner taken from the caller context, status `queued`, timestamps
    /// set to now. Client input can never forge any of these.
    pub fn from_delta(ctx: &RequestContext, delta: ImageDelta) -> Self {
        let now = Timestamp::now();
        Self {
            id: delta.id.unwrap_or_else(ImageId::generate),
            name: delta.name,
            status: ImageStatus::Queued,
            is_public: delta.is_public.unwrap_or(false),
            owner: ctx.tenant.clone(),
            tags: delta.tags.unwrap_or_default(),
            size: None,
            checksum: None,
            disk_format: delta.disk_format,
            container_format: delta.container_format,
            min_ram: delta.min_ram,
            min_disk: delta.min_disk,
            protected: delta.protected.unwrap_or(false),
            location: None,
            properties: delta.properties,
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
        }
    }

    /// Apply a validated update payload.
    ///
    /// Only fields present in the delta change; the property bag is
    /// replaced wholesale (an update that names no properties clears it).
    /// `updated_at` is re-stamped.
    pub fn apply_delta(&mut self, delta: ImageDelta) {
        if let Some(name) = delta.name {
            self.name = Some(name);
        }
        if let Some(is_public) = delta.is_public {
            self.is_public = is_public;
        }
        if let Some(tags) = delta.tags {
            self.tags = tags;
        }
        if let Some(disk_format) = delta.disk_format {
            self.disk_format = Some(disk_format);
        }
        if let Some(container_format) = delta.container_format {
            self.container_format = Some(container_format);
        }
        if let Some(min_ram) = delta.min_ram {
            self.min_ram = Some(min_ram);
        }
        if let Some(min_disk) = delta.min_disk {
            self.min_disk = Some(min_disk);
        }
        if let Some(protected) = delta.protected {
            self.protected = protected;
        }
        self.properties = delta.properties;
        self.updated_at = Timestamp::now();
    }

    /// Whether the caller may see this record.
    ///
    /// Public records are visible to everyone; private records only to
    /// their owner and to administrative callers.
    pub fn visible_to(&self, ctx: &RequestContext) -> bool {
        if ctx.is_admin || self.is_public {
            return true;
        }
        match (&self.owner, &ctx.tenant) {
            (Some(owner), Some(tenant)) => owner == tenant,
            _ => false,
        }
    }
}

/// A validated create/update payload: only the client-writable fields.
///
/// Produced by the request deserializer after read-only and schema checks.
/// Absent fields are `None`, which an update leaves untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDelta {
    /// Client-supplied identifier (create only; must be a UUID).
    pub id: Option<ImageId>,
    pub name: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub disk_format: Option<String>,
    pub container_format: Option<String>,
    pub min_ram: Option<u64>,
    pub min_disk: Option<u64>,
    pub protected: Option<bool>,
    /// Validated dynamic properties. Replaces the stored bag on update.
    pub properties: BTreeMap<String, Value>,
}

/// Collapse duplicate tags, preserving first occurrence order.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}
