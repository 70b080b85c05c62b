//! # Image Schema
//!
//! The configuration value object threaded into the deserializer and
//! serializer at construction time. Combines the fixed-field descriptor
//! set with custom property descriptors and the additional-properties
//! toggle, and renders the whole thing as a JSON Schema document.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use crate::fields::{FieldKind, FixedField, PropertyDescriptor};

/// The complete schema of the image resource.
///
/// Immutable after construction. Derive variants via
/// [`ImageSchema::with_custom_properties`] and
/// [`ImageSchema::allows_additional`].
#[derive(Debug, Clone)]
pub struct ImageSchema {
    fixed: Vec<FixedField>,
    custom: BTreeMap<String, PropertyDescriptor>,
    allow_additional: bool,
}

impl ImageSchema {
    /// The fixed-field descriptor set of the image resource, with no
    /// custom properties and additional properties allowed.
    pub fn base() -> Self {
        let fixed = vec![
            FixedField::writable("id", FieldKind::String),
            FixedField::writable("name", FieldKind::String),
            FixedField {
                name: "visibility",
                kind: FieldKind::String,
                read_only: false,
                enum_values: Some(vec!["public", "private"]),
            },
            FixedField::writable("protected", FieldKind::Boolean),
            FixedField::writable("tags", FieldKind::StringArray),
            FixedField::writable("container_format", FieldKind::String),
            FixedField::writable("disk_format", FieldKind::String),
            FixedField::writable("min_ram", FieldKind::Integer),
            FixedField::writable("min_disk", FieldKind::Integer),
            FixedField::read_only("status", FieldKind::String),
            FixedField::read_only("size", FieldKind::Integer),
            FixedField::read_only("checksum", FieldKind::String),
            FixedField::read_only("created_at", FieldKind::String),
            FixedField::read_only("updated_at", FieldKind::String),
            FixedField::read_only("direct_url", FieldKind::String),
            FixedField::read_only("self", FieldKind::String),
            FixedField::read_only("file", FieldKind::String),
            FixedField::read_only("schema", FieldKind::String),
        ];
        Self {
            fixed,
            custom: BTreeMap::new(),
            allow_additional: true,
        }
    }

    /// Derive a schema with the given custom property descriptors.
    pub fn with_custom_properties(
        mut self,
        descriptors: BTreeMap<String, PropertyDescriptor>,
    ) -> Self {
        self.custom = descriptors;
        self
    }

    /// Derive a schema with the additional-properties toggle set.
    ///
    /// When false, any property outside both the fixed set and the custom
    /// descriptors is rejected.
    pub fn allows_additional(mut self, allow: bool) -> Self {
        self.allow_additional = allow;
        self
    }

    /// The fixed-field descriptors.
    pub fn fixed_fields(&self) -> &[FixedField] {
        &self.fixed
    }

    /// Names of fields rejected in mutation bodies.
    pub fn read_only_fields(&self) -> BTreeSet<&'static str> {
        self.fixed
            .iter()
            .filter(|f| f.read_only)
            .map(|f| f.name)
            .collect()
    }

    /// Names of fixed fields a mutation body may carry.
    pub fn writable_fixed_fields(&self) -> BTreeSet<&'static str> {
        self.fixed
            .iter()
            .filter(|f| !f.read_only)
            .map(|f| f.name)
            .collect()
    }

    /// The custom property descriptors.
    pub fn custom_properties(&self) -> &BTreeMap<String, PropertyDescriptor> {
        &self.custom
    }

    /// Whether properties outside both descriptor sets are accepted.
    pub fn additional_allowed(&self) -> bool {
        self.allow_additional
    }

    /// Render the JSON Schema document for a single image.
    ///
    /// Custom properties appear alongside the fixed fields; required
    /// custom properties populate `required`. `additionalProperties` is
    /// either `false` or a scalar-only type constraint — the wire
    /// property bag never carries lists or mappings.
    pub fn document(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fixed {
            properties.insert(field.name.to_string(), field.json_schema());
        }
        for (name, descriptor) in &self.custom {
            properties.insert(name.clone(), descriptor.json_schema());
        }

        let required: Vec<&str> = self
            .custom
            .iter()
            .filter(|(_, d)| d.required)
            .map(|(name, _)| name.as_str())
            .collect();

        let additional = if self.allow_additional {
            json!({"type": ["string", "number", "boolean"]})
        } else {
            json!(false)
        };

        let mut document = json!({
            "name": "image",
            "type": "object",
            "properties": Value::Object(properties),
            "additionalProperties": additional,
        });
        if !required.is_empty() {
            document["required"] = json!(required);
        }
        document
    }

    /// Render the JSON Schema document for a page of images.
    pub fn collection_document(&self) -> Value {
        json!({
            "name": "images",
            "type": "object",
            "properties": {
                "images": {"type": "array", "items": self.document()},
                "first": {"type": "string"},
                "next": {"type": "string"},
                "schema": {"type": "string"},
            },
        })
    }
}

impl Default for ImageSchema {
    fn default() -> Self {
        Self::base()
    }
}
