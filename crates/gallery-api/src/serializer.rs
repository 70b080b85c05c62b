//! # Response Serializer
//!
//! Renders domain entities and pages as wire objects. Null-valued
//! optional fields are omitted entirely, never rendered as JSON null,
//! and hypermedia links are attached here so the domain layer stays
//! path-agnostic.
//!
//! Property-bag values are surfaced exactly as stored. A record written
//! under an earlier descriptor set may carry properties the current
//! schema would reject; serialization never re-validates on the way out.

use serde_json::{json, Map, Value};

use gallery_core::Image;
use gallery_registry::{Page, PageRequest};
use gallery_schema::ImageSchema;

/// Renders images and pages for the wire.
pub struct ResponseSerializer {
    custom: Vec<String>,
    allow_additional: bool,
    show_direct_url: bool,
}

impl ResponseSerializer {
    pub fn new(schema: &ImageSchema, show_direct_url: bool) -> Self {
        Self {
            custom: schema.custom_properties().keys().cloned().collect(),
            allow_additional: schema.additional_allowed(),
            show_direct_url,
        }
    }

    /// The entity's canonical path, also used as the create Location
    /// header.
    pub fn self_link(image: &Image) -> String {
        format!("/images/{}", image.id)
    }

    /// Render a single image as a wire object.
    pub fn image(&self, image: &Image) -> Value {
        let mut out = Map::new();
        out.insert("id".to_string(), json!(image.id.to_string()));
        if let Some(name) = &image.name {
            out.insert("name".to_string(), json!(name));
        }
        out.insert("status".to_string(), json!(image.status.as_str()));
        out.insert(
            "visibility".to_string(),
            json!(if image.is_public { "public" } else { "private" }),
        );
        out.insert("protected".to_string(), json!(image.protected));
        out.insert("tags".to_string(), json!(image.tags));
        if let Some(size) = image.size {
            out.insert("size".to_string(), json!(size));
        }
        if let Some(checksum) = &image.checksum {
            out.insert("checksum".to_string(), json!(checksum));
        }
        if let Some(format) = &image.container_format {
            out.insert("container_format".to_string(), json!(format));
        }
        if let Some(format) = &image.disk_format {
            out.insert("disk_format".to_string(), json!(format));
        }
        if let Some(min_ram) = image.min_ram {
            out.insert("min_ram".to_string(), json!(min_ram));
        }
        if let Some(min_disk) = image.min_disk {
            out.insert("min_disk".to_string(), json!(min_disk));
        }
        out.insert("created_at".to_string(), json!(image.created_at.to_iso8601()));
        out.insert("updated_at".to_string(), json!(image.updated_at.to_iso8601()));

        if self.show_direct_url {
            if let Some(location) = &image.location {
                out.insert("direct_url".to_string(), json!(location));
            }
        }

        for (key, value) in &image.properties {
            if self.allow_additional || self.custom.iter().any(|c| c == key) {
                out.insert(key.clone(), value.clone());
            }
        }

        let self_link = Self::self_link(image);
        out.insert("file".to_string(), json!(format!("{self_link}/file")));
        out.insert("self".to_string(), json!(self_link));
        out.insert("schema".to_string(), json!("/schemas/image"));
        Value::Object(out)
    }

    /// Render a page as a wire object.
    ///
    /// `first` echoes only the parameters the client actually sent, with
    /// any marker stripped; a bare list query yields a bare `/images`.
    /// `next` appears only when the engine produced a marker.
    pub fn page(&self, page: &Page, request: &PageRequest) -> Value {
        let images: Vec<Value> = page.images.iter().map(|i| self.image(i)).collect();

        let mut params = Vec::new();
        if let Some(key) = request.sort_key {
            params.push(format!("sort_key={}", key.as_str()));
        }
        if let Some(dir) = request.sort_dir {
            params.push(format!("sort_dir={}", dir.as_str()));
        }
        if let Some(limit) = request.limit {
            params.push(format!("limit={limit}"));
        }
        let first = if params.is_empty() {
            "/images".to_string()
        } else {
            format!("/images?{}", params.join("&"))
        };

        let mut out = Map::new();
        out.insert("images".to_string(), Value::Array(images));
        out.insert("first".to_string(), json!(first));
        if let Some(marker) = &page.next_marker {
            let sep = if params.is_empty() { '?' } else { '&' };
            out.insert("next".to_string(), json!(format!("{first}{sep}marker={marker}")));
        }
        out.insert("schema".to_string(), json!("/schemas/images"));
        Value::Object(out)
    }
}
