//! # Service Configuration
//!
//! Deployment-level knobs: bind address, page limits, the direct-URL
//! display flag, and the schema extension mechanisms. Loaded once at
//! startup; the schema, deserializer, and serializer built from it are
//! immutable for the life of the process.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use gallery_schema::{ImageSchema, PropertyDescriptor};

/// Startup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    /// Page size when the client requests none.
    pub default_limit: u32,
    /// Hard cap on requested page sizes.
    pub max_limit: u32,
    /// Whether entity responses expose the raw store locator.
    pub show_direct_url: bool,
    /// Whether properties outside the descriptor sets are accepted.
    pub allow_additional_properties: bool,
    /// Deployment-defined custom property descriptors.
    pub custom_properties: BTreeMap<String, PropertyDescriptor>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9292".to_string(),
            default_limit: 25,
            max_limit: 500,
            show_direct_url: false,
            allow_additional_properties: true,
            custom_properties: BTreeMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Load from the file named by `GALLERY_CONFIG`, or defaults when
    /// the variable is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("GALLERY_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Build the image schema this deployment serves.
    pub fn schema(&self) -> ImageSchema {
        ImageSchema::base()
            .with_custom_properties(self.custom_properties.clone())
            .allows_additional(self.allow_additional_properties)
    }
}
