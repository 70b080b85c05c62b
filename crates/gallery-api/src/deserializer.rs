//! # Request Deserializer
//!
//! Turns raw bodies and query strings into validated domain inputs. The
//! pipeline order is load-bearing: read-only field rejection runs before
//! schema validation, so a body naming `status` gets a 403 even when the
//! rest of it is garbage.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use gallery_core::{dedup_tags, ImageDelta, ImageId, RegistryError};
use gallery_registry::{PageRequest, SortDir, SortKey};
use gallery_schema::{BodyValidator, ImageSchema, SchemaBuildError};

/// Validates and transforms incoming request payloads.
pub struct RequestDeserializer {
    validator: BodyValidator,
    read_only: BTreeSet<&'static str>,
}

impl RequestDeserializer {
    /// Compile the body validator for a schema.
    pub fn new(schema: &ImageSchema) -> Result<Self, SchemaBuildError> {
        Ok(Self {
            validator: BodyValidator::new(schema)?,
            read_only: schema.read_only_fields(),
        })
    }

    /// Deserialize a create body.
    pub fn create(&self, body: &[u8]) -> Result<ImageDelta, RegistryError> {
        self.mutation(body)
    }

    /// Deserialize an update body. Same pipeline as create; fields the
    /// update cannot change (notably `id`) are ignored downstream.
    pub fn update(&self, body: &[u8]) -> Result<ImageDelta, RegistryError> {
        self.mutation(body)
    }

    fn mutation(&self, body: &[u8]) -> Result<ImageDelta, RegistryError> {
        if body.is_empty() {
            return Err(RegistryError::bad_request("request body is empty"));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RegistryError::bad_request(format!("malformed JSON body: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| RegistryError::bad_request("request body must be a JSON object"))?;

        // Read-only rejection precedes schema validation.
        for key in object.keys() {
            if self.read_only.contains(key.as_str()) {
                return Err(RegistryError::forbidden(format!(
                    "attribute '{key}' is read-only"
                )));
            }
        }

        self.validator.validate(&value)?;

        let mut delta = ImageDelta::default();
        for (key, val) in object {
            match key.as_str() {
                "id" => {
                    let raw = as_string(key, val)?;
                    delta.id = Some(ImageId::parse(&raw)?);
                }
                "name" => delta.name = Some(as_string(key, val)?),
                "visibility" => {
                    delta.is_public = Some(match as_string(key, val)?.as_str() {
                        "public" => true,
                        "private" => false,
                        other => {
                            return Err(RegistryError::bad_request(format!(
                                "visibility must be 'public' or 'private', got '{other}'"
                            )))
                        }
                    });
                }
                "protected" => delta.protected = Some(as_bool(key, val)?),
                "tags" => delta.tags = Some(dedup_tags(as_string_array(key, val)?)),
                "container_format" => delta.container_format = Some(as_string(key, val)?),
                "disk_format" => delta.disk_format = Some(as_string(key, val)?),
                "min_ram" => delta.min_ram = Some(as_uint(key, val)?),
                "min_disk" => delta.min_disk = Some(as_uint(key, val)?),
                // Custom and additional properties, already validated.
                _ => {
                    delta.properties.insert(key.clone(), val.clone());
                }
            }
        }
        Ok(delta)
    }

    /// Parse list query parameters.
    ///
    /// Returns the validated page request and the leftover key/value
    /// pairs, which form the raw filter map. `visibility` is rewritten to
    /// the storage-level `is_public` name on the way through.
    pub fn index(
        &self,
        query: &BTreeMap<String, String>,
    ) -> Result<(PageRequest, BTreeMap<String, String>), RegistryError> {
        let mut request = PageRequest::default();
        let mut filters = BTreeMap::new();

        for (key, value) in query {
            match key.as_str() {
                "limit" => {
                    let limit: u32 = value.parse().map_err(|_| {
                        RegistryError::bad_request(format!(
                            "limit must be a non-negative integer, got '{value}'"
                        ))
                    })?;
                    request.limit = Some(limit);
                }
                "marker" => request.marker = Some(ImageId::parse(value)?),
                "sort_key" => request.sort_key = Some(SortKey::parse(value)?),
                "sort_dir" => request.sort_dir = Some(SortDir::parse(value)?),
                "visibility" => {
                    let is_public = match value.as_str() {
                        "public" => "true",
                        "private" => "false",
                        other => {
                            return Err(RegistryError::bad_request(format!(
                                "visibility must be 'public' or 'private', got '{other}'"
                            )))
                        }
                    };
                    filters.insert("is_public".to_string(), is_public.to_string());
                }
                _ => {
                    filters.insert(key.clone(), value.clone());
                }
            }
        }
        Ok((request, filters))
    }
}

fn as_string(key: &str, val: &Value) -> Result<String, RegistryError> {
    val.as_str()
        .map(str::to_string)
        .ok_or_else(|| RegistryError::bad_request(format!("attribute '{key}' must be a string")))
}

fn as_bool(key: &str, val: &Value) -> Result<bool, RegistryError> {
    val.as_bool()
        .ok_or_else(|| RegistryError::bad_request(format!("attribute '{key}' must be a boolean")))
}

fn as_uint(key: &str, val: &Value) -> Result<u64, RegistryError> {
    val.as_u64().ok_or_else(|| {
        RegistryError::bad_request(format!("attribute '{key}' must be a non-negative integer"))
    })
}

fn as_string_array(key: &str, val: &Value) -> Result<Vec<String>, RegistryError> {
    let items = val.as_array().ok_or_else(|| {
        RegistryError::bad_request(format!("attribute '{key}' must be an array of strings"))
    })?;
    items
        .iter()
        .map(|item| as_string(key, item))
        .collect::<Result<Vec<_>, _>>()
}

#[cfg(test)]
mod tests {
    use gallery_schema::{PropertyDescriptor, PropertyType};

    use super::*;

    fn deserializer() -> RequestDeserializer {
        RequestDeserializer::new(&ImageSchema::base()).unwrap()
    }

    fn deserializer_for(schema: ImageSchema) -> RequestDeserializer {
        RequestDeserializer::new(&schema).unwrap()
    }

    #[test]
    fn test_create_with_fixed_fields() {
        let body = serde_json::json!({
            "name": "image-1",
            "visibility": "public",
            "tags": ["ping", "pong", "ping"],
            "min_ram": 512,
        });
        let delta = deserializer().create(body.to_string().as_bytes()).unwrap();
        assert_eq!(delta.name.as_deref(), Some("image-1"));
        assert_eq!(delta.is_public, Some(true));
        assert_eq!(delta.tags.as_deref(), Some(&["ping".to_string(), "pong".to_string()][..]));
        assert_eq!(delta.min_ram, Some(512));
    }

    #[test]
    fn test_empty_object_is_a_valid_create() {
        let delta = deserializer().create(b"{}").unwrap();
        assert_eq!(delta, ImageDelta::default());
    }

    #[test]
    fn test_missing_body_is_bad_request() {
        let err = deserializer().create(b"").unwrap_err();
        assert!(matches!(err, RegistryError::BadRequest(_)));
    }

    #[test]
    fn test_non_object_root_is_bad_request() {
        let err = deserializer().create(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, RegistryError::BadRequest(_)));
    }

    #[test]
    fn test_read_only_field_is_forbidden() {
        for field in ["status", "created_at", "size", "checksum", "self"] {
            let body = format!("{{\"{field}\": \"x\"}}");
            let err = deserializer().create(body.as_bytes()).unwrap_err();
            assert!(
                matches!(err, RegistryError::Forbidden(_)),
                "expected Forbidden for '{field}'"
            );
        }
    }

    #[test]
    fn test_read_only_check_precedes_schema_validation() {
        // `visibility` is also invalid here; the read-only `status` wins.
        let body = serde_json::json!({"status": "active", "visibility": "bogus"});
        let err = deserializer().create(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::Forbidden(_)));
    }

    #[test]
    fn test_bad_visibility_is_bad_request() {
        let body = serde_json::json!({"visibility": "everyone"});
        let err = deserializer().create(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::BadRequest(_)));
    }

    #[test]
    fn test_client_id_must_be_uuid() {
        let body = serde_json::json!({"id": "not-a-uuid"});
        let err = deserializer().create(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::BadRequest(_)));

        let body = serde_json::json!({"id": "6bbe7cc2-eae7-4c0f-b50d-a7160b0c6a86"});
        let delta = deserializer().create(body.to_string().as_bytes()).unwrap();
        assert_eq!(
            delta.id.unwrap().to_string(),
            "6bbe7cc2-eae7-4c0f-b50d-a7160b0c6a86"
        );
    }

    #[test]
    fn test_custom_enum_property() {
        let mut custom = BTreeMap::new();
        custom.insert(
            "color".to_string(),
            PropertyDescriptor {
                kind: PropertyType::String,
                required: false,
                enum_values: Some(vec![
                    Value::String("red".to_string()),
                    Value::String("green".to_string()),
                ]),
            },
        );
        let d = deserializer_for(ImageSchema::base().with_custom_properties(custom));

        let ok = serde_json::json!({"color": "red"});
        let delta = d.create(ok.to_string().as_bytes()).unwrap();
        assert_eq!(delta.properties["color"], Value::String("red".to_string()));

        let bad = serde_json::json!({"color": "blue"});
        assert!(matches!(
            d.create(bad.to_string().as_bytes()).unwrap_err(),
            RegistryError::BadRequest(_)
        ));
    }

    #[test]
    fn test_additional_properties_toggle() {
        let closed = deserializer_for(ImageSchema::base().allows_additional(false));
        let body = serde_json::json!({"free_form": "yes"});
        assert!(matches!(
            closed.create(body.to_string().as_bytes()).unwrap_err(),
            RegistryError::BadRequest(_)
        ));

        let open = deserializer();
        let delta = open.create(body.to_string().as_bytes()).unwrap();
        assert_eq!(delta.properties["free_form"], Value::String("yes".to_string()));

        // Scalars only, even when the bag is open.
        let nested = serde_json::json!({"free_form": {"nested": true}});
        assert!(matches!(
            open.create(nested.to_string().as_bytes()).unwrap_err(),
            RegistryError::BadRequest(_)
        ));
    }

    #[test]
    fn test_index_keeps_unspecified_params_absent() {
        let (request, filters) = deserializer().index(&BTreeMap::new()).unwrap();
        assert!(request.sort_key.is_none());
        assert!(request.sort_dir.is_none());
        assert!(request.limit.is_none());
        assert!(request.marker.is_none());
        assert!(filters.is_empty());

        // Defaults kick in at the engine, not in the parsed request.
        assert_eq!(request.effective_sort_key(), SortKey::CreatedAt);
        assert_eq!(request.effective_sort_dir(), SortDir::Desc);
    }

    #[test]
    fn test_index_rejects_bad_limits() {
        for bad in ["blah", "-1", "1.1"] {
            let query = BTreeMap::from([("limit".to_string(), bad.to_string())]);
            let err = deserializer().index(&query).unwrap_err();
            assert!(
                matches!(err, RegistryError::BadRequest(_)),
                "expected BadRequest for limit '{bad}'"
            );
        }
        // Zero is legal.
        let query = BTreeMap::from([("limit".to_string(), "0".to_string())]);
        let (request, _) = deserializer().index(&query).unwrap();
        assert_eq!(request.limit, Some(0));
    }

    #[test]
    fn test_index_maps_visibility_filter() {
        let query = BTreeMap::from([
            ("visibility".to_string(), "public".to_string()),
            ("name".to_string(), "image-1".to_string()),
        ]);
        let (_, filters) = deserializer().index(&query).unwrap();
        assert_eq!(filters.get("is_public").map(String::as_str), Some("true"));
        assert_eq!(filters.get("name").map(String::as_str), Some("image-1"));
        assert!(!filters.contains_key("visibility"));
    }

    #[test]
    fn test_index_rejects_unknown_sort_key() {
        let query = BTreeMap::from([("sort_key".to_string(), "spongebob".to_string())]);
        assert!(matches!(
            deserializer().index(&query).unwrap_err(),
            RegistryError::BadRequest(_)
        ));
    }
}
