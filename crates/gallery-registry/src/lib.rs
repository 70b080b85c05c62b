//! # gallery-registry — Domain Layer
//!
//! The request/response transformation core of the registry, independent
//! of any transport:
//!
//! - **Filter criteria** — typed predicates parsed from raw query
//!   parameters and applied as a conjunction.
//! - **Pagination engine** — keyset pagination over a `(sort_key, id)`
//!   total order; stable under concurrent insert/delete of unrelated
//!   records.
//! - **Policy gate** — a read-mostly rule table consulted once per
//!   logical operation.
//! - **Repository & store contracts** — the narrow seams to the external
//!   persistence engine and byte store, with an in-memory reference
//!   backend for tests and development.
//! - **Resource controller** — the only component that touches all of
//!   the above.
//!
//! ## Crate Policy
//!
//! - No HTTP types; the API crate owns the wire surface.
//! - The pagination engine performs no mutation and may run fully in
//!   parallel across requests.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod audit;
pub mod controller;
pub mod filter;
pub mod memory;
pub mod page;
pub mod policy;
pub mod repo;

pub use controller::ImageController;
pub use filter::{FilterSet, LocationExclusion};
pub use memory::{MemoryRepository, MemoryStore};
pub use page::{paginate, Page, PageConfig, PageRequest, SortDir, SortKey};
pub use policy::PolicyEnforcer;
pub use repo::{ImageRepository, ImageStore};
