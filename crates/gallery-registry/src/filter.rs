//! # Filter Criteria
//!
//! Typed filter predicates over the image collection. A filter set is a
//! conjunction: a record matches only when every present predicate
//! accepts it.
//!
//! The vocabulary covers exact-match keys, booleans, numeric and time
//! ranges, and the `location_not` exclusion consumed by the audit
//! collaborator. Keys outside the vocabulary filter against the dynamic
//! property bag. Values that fail to parse for their key are a client
//! error, never silently ignored.

use std::collections::BTreeMap;

use gallery_core::{Image, RegistryError, Timestamp};

/// The `location_not` predicate: exclude records by store locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationExclusion {
    /// Exclude records with no locator (keep only records with bytes).
    Unset,
    /// Exclude records whose locator equals the given value.
    Equals(String),
}

/// A conjunction of per-key predicates over the image collection.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub checksum: Option<String>,
    pub container_format: Option<String>,
    pub disk_format: Option<String>,
    pub is_public: Option<bool>,
    /// Absent means non-deleted records only.
    pub deleted: Option<bool>,
    pub size_min: Option<u64>,
    pub size_max: Option<u64>,
    pub created_at_max: Option<Timestamp>,
    pub deleted_at_min: Option<Timestamp>,
    pub location_not: Option<LocationExclusion>,
    /// Keys outside the fixed vocabulary, matched against the property bag.
    pub properties: BTreeMap<String, String>,
}

impl FilterSet {
    /// Parse a filter set from the raw key/value parameters left over by
    /// the request deserializer.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BadRequest`] for range values that are
    /// not non-negative integers, booleans that are not `true`/`false`,
    /// and timestamps that are not RFC 3339.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self, RegistryError> {
        let mut filters = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "id" => filters.id = Some(value.clone()),
                "name" => filters.name = Some(value.clone()),
                "status" => filters.status = Some(value.clone()),
                "checksum" => filters.checksum = Some(value.clone()),
                "container_format" => filters.container_format = Some(value.clone()),
                "disk_format" => filters.disk_format = Some(value.clone()),
                "is_public" => filters.is_public = Some(parse_bool(key, value)?),
                "deleted" => filters.deleted = Some(parse_bool(key, value)?),
                "size_min" => filters.size_min = Some(parse_size(key, value)?),
                "size_max" => filters.size_max = Some(parse_size(key, value)?),
                "created_at_max" => filters.created_at_max = Some(Timestamp::parse(value)?),
                "deleted_at_min" => filters.deleted_at_min = Some(Timestamp::parse(value)?),
                "location_not" => {
                    filters.location_not = Some(if value.is_empty() {
                        LocationExclusion::Unset
                    } else {
                        LocationExclusion::Equals(value.clone())
                    });
                }
                _ => {
                    filters.properties.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(filters)
    }

    /// Whether the record satisfies every present predicate.
    pub fn matches(&self, image: &Image) -> bool {
        if let Some(id) = &self.id {
            if image.id.to_string() != *id {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if image.name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if image.status.as_str() != status {
                return false;
            }
        }
        if let Some(checksum) = &self.checksum {
            if image.checksum.as_deref() != Some(checksum.as_str()) {
                return false;
            }
        }
        if let Some(format) = &self.container_format {
            if image.container_format.as_deref() != Some(format.as_str()) {
                return false;
            }
        }
        if let Some(format) = &self.disk_format {
            if image.disk_format.as_deref() != Some(format.as_str()) {
                return false;
            }
        }
        if let Some(is_public) = self.is_public {
            if image.is_public != is_public {
                return false;
            }
        }
        if image.deleted != self.deleted.unwrap_or(false) {
            return false;
        }
        if let Some(min) = self.size_min {
            if !image.size.is_some_and(|s| s >= min) {
                return false;
            }
        }
        if let Some(max) = self.size_max {
            if !image.size.is_some_and(|s| s <= max) {
                return false;
            }
        }
        if let Some(max) = self.created_at_max {
            if image.created_at > max {
                return false;
            }
        }
        if let Some(min) = self.deleted_at_min {
            if !image.deleted_at.is_some_and(|d| d >= min) {
                return false;
            }
        }
        if let Some(exclusion) = &self.location_not {
            let keep = match exclusion {
                LocationExclusion::Unset => image.location.is_some(),
                LocationExclusion::Equals(v) => image.location.as_deref() != Some(v.as_str()),
            };
            if !keep {
                return false;
            }
        }
        for (key, expected) in &self.properties {
            let found = match image.properties.get(key) {
                Some(serde_json::Value::String(s)) => s == expected,
                Some(other) => other.to_string() == *expected,
                None => false,
            };
            if !found {
                return false;
            }
        }
        true
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, RegistryError> {
    match value {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        _ => Err(RegistryError::bad_request(format!(
            "filter '{key}' must be true or false, got '{value}'"
        ))),
    }
}

fn parse_size(key: &str, value: &str) -> Result<u64, RegistryError> {
    value.parse::<u64>().map_err(|_| {
        RegistryError::bad_request(format!(
            "filter '{key}' must be a non-negative integer, got '{value}'"
        ))
    })
}
