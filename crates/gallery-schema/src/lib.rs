//! # gallery-schema — Schema Registry
//!
//! Holds the fixed-field schema of the image resource plus the two
//! deployment-configured extension mechanisms:
//!
//! - **Custom property descriptors** — named, typed, optionally-enumerated
//!   and optionally-required extension fields.
//! - **Additional properties toggle** — whether free-form properties
//!   outside both the fixed set and the custom descriptors are accepted
//!   (scalar values only).
//!
//! The schema is pure data: an immutable value object constructed at
//! startup and passed by reference into the request deserializer and the
//! response serializer. It is never mutated mid-request.
//!
//! Validation of incoming bodies uses a compiled `jsonschema` validator
//! built once from the generated JSON Schema document.

pub mod fields;
pub mod schema;
pub mod validate;

pub use fields::{FieldKind, FixedField, PropertyDescriptor, PropertyType};
pub use schema::ImageSchema;
pub use validate::{BodyValidator, SchemaBuildError};
