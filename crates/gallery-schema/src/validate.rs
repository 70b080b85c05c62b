//! # Body Validation
//!
//! Compiled JSON Schema validation of mutation bodies, backed by the
//! `jsonschema` crate. The validator is built once from the schema
//! registry document and shared across requests; a schema violation is a
//! deterministic client error.

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use gallery_core::RegistryError;

use crate::schema::ImageSchema;

/// Error while compiling the schema document into a validator.
///
/// This is a startup-time failure, not a request error: the document is
/// generated from the schema registry, so a build failure means the
/// deployment configuration is unusable.
#[derive(Error, Debug)]
pub enum SchemaBuildError {
    /// The generated document could not be compiled.
    #[error("cannot compile image schema: {reason}")]
    Compile {
        /// Reason reported by the jsonschema crate.
        reason: String,
    },
}

/// A compiled validator for image mutation bodies.
///
/// `BodyValidator` is `Send + Sync`; compile once per process and share.
#[derive(Debug)]
pub struct BodyValidator {
    validator: Validator,
}

impl BodyValidator {
    /// Compile the validator for the given schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaBuildError::Compile`] when the generated document
    /// cannot be compiled.
    pub fn new(schema: &ImageSchema) -> Result<Self, SchemaBuildError> {
        let document = schema.document();
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts
            .build(&document)
            .map_err(|e| SchemaBuildError::Compile {
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Validate a parsed mutation body.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BadRequest`] carrying every violation:
    /// custom property type/enum mismatches, disallowed or non-scalar
    /// additional properties, and wrong fixed-field types.
    pub fn validate(&self, body: &Value) -> Result<(), RegistryError> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(body)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::bad_request(violations.join("; ")))
        }
    }
}
