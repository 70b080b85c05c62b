//! # gallery-core — Foundational Types for the Gallery Registry
//!
//! The bedrock of the Gallery workspace. Defines the identifier newtypes,
//! the UTC-only timestamp type, the request context, the shared error
//! kinds, and the `Image` data model that every other crate operates on.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ImageId` and `TenantId`
//!    are newtypes with validated constructors. No bare strings for
//!    identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, matching the wire rendering rules.
//!
//! 3. **One error vocabulary.** Every layer classifies failures into the
//!    same four kinds (`BadRequest`, `Forbidden`, `NotFound`, `Conflict`),
//!    which the API layer maps onto HTTP statuses without translation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `gallery-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a boundary.

pub mod context;
pub mod error;
pub mod identity;
pub mod image;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use context::RequestContext;
pub use error::RegistryError;
pub use identity::{ImageId, TenantId};
pub use image::{dedup_tags, Image, ImageDelta, ImageStatus};
pub use temporal::Timestamp;
