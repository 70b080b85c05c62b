//! # Field Descriptors
//!
//! Descriptors for the two kinds of schema entries: fixed fields shipped
//! with the resource definition, and custom properties configured per
//! deployment.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// JSON type of a fixed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    /// An array of strings (the `tags` field).
    StringArray,
}

impl FieldKind {
    /// The JSON Schema fragment for this kind.
    pub fn json_schema(&self) -> Value {
        match self {
            Self::String => json!({"type": "string"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::StringArray => json!({"type": "array", "items": {"type": "string"}}),
        }
    }
}

/// Descriptor of a fixed field of the image resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedField {
    /// Wire-format field name.
    pub name: &'static str,
    /// JSON type.
    pub kind: FieldKind,
    /// Read-only fields are rejected in mutation bodies before any
    /// schema-type validation runs.
    pub read_only: bool,
    /// Enumerated allowed values, if constrained (e.g. `visibility`).
    pub enum_values: Option<Vec<&'static str>>,
}

impl FixedField {
    /// A writable field of the given kind.
    pub const fn writable(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            read_only: false,
            enum_values: None,
        }
    }

    /// A read-only field of the given kind.
    pub const fn read_only(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            read_only: true,
            enum_values: None,
        }
    }

    /// The JSON Schema fragment for this field.
    pub fn json_schema(&self) -> Value {
        let mut fragment = self.kind.json_schema();
        if let Some(values) = &self.enum_values {
            fragment["enum"] = json!(values);
        }
        if self.read_only {
            fragment["readOnly"] = json!(true);
        }
        fragment
    }
}

/// Scalar type of a custom or additional property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
}

impl PropertyType {
    /// The JSON Schema type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// A custom property descriptor, defined by deployment configuration.
///
/// Distinct from ad hoc additional properties: a custom property is
/// type-checked (and enum-checked when constrained) on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Scalar type of the property value.
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Whether mutation bodies must carry this property.
    #[serde(default)]
    pub required: bool,
    /// Enumerated allowed values, if constrained.
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
}

impl PropertyDescriptor {
    /// The JSON Schema fragment for this property.
    pub fn json_schema(&self) -> Value {
        let mut fragment = json!({"type": self.kind.type_name()});
        if let Some(values) = &self.enum_values {
            fragment["enum"] = json!(values);
        }
        fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_field_fragment_carries_enum_and_read_only() {
        let field = FixedField {
            name: "visibility",
            kind: FieldKind::String,
            read_only: false,
            enum_values: Some(vec!["public", "private"]),
        };
        let fragment = field.json_schema();
        assert_eq!(fragment["enum"], json!(["public", "private"]));
        assert!(fragment.get("readOnly").is_none());

        let ro = FixedField::read_only("status", FieldKind::String);
        assert_eq!(ro.json_schema()["readOnly"], json!(true));
    }

    #[test]
    fn test_property_descriptor_fragment() {
        let desc = PropertyDescriptor {
            kind: PropertyType::String,
            required: true,
            enum_values: Some(vec![json!("red"), json!("green")]),
        };
        let fragment = desc.json_schema();
        assert_eq!(fragment["type"], json!("string"));
        assert_eq!(fragment["enum"], json!(["red", "green"]));
    }

    #[test]
    fn test_descriptor_deserializes_from_config_shape() {
        let desc: PropertyDescriptor = serde_json::from_value(json!({
            "type": "string",
            "required": true,
            "enum": ["on", "off"],
        }))
        .unwrap();
        assert_eq!(desc.kind, PropertyType::String);
        assert!(desc.required);
    }
}
