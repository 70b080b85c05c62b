//! # In-Memory Backend
//!
//! Reference implementations of the repository and store contracts,
//! used by the test suites and the development server. Records live in
//! an `RwLock`-wrapped map; soft-deleted records are retained so audit
//! queries can still reach them.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use gallery_core::{
    Image, ImageDelta, ImageId, ImageStatus, RegistryError, RequestContext, Timestamp,
};

use crate::filter::FilterSet;
use crate::repo::{ImageRepository, ImageStore};

/// In-memory image repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    images: RwLock<BTreeMap<ImageId, Image>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing server-side stamping.
    /// Intended for seeding fixtures with explicit timestamps.
    pub fn insert(&self, image: Image) {
        let mut images = self.write();
        images.insert(image.id, image);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<ImageId, Image>> {
        self.images.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<ImageId, Image>> {
        self.images.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageRepository for MemoryRepository {
    fn list(
        &self,
        ctx: &RequestContext,
        _filters: &FilterSet,
    ) -> Result<Vec<Image>, RegistryError> {
        // Predicates are re-applied by the pagination engine, so this
        // backend only narrows to the caller-visible set.
        let images = self.read();
        Ok(images
            .values()
            .filter(|image| image.visible_to(ctx))
            .cloned()
            .collect())
    }

    fn get(&self, ctx: &RequestContext, id: &ImageId) -> Result<Image, RegistryError> {
        let images = self.read();
        images
            .get(id)
            .filter(|image| !image.deleted && image.visible_to(ctx))
            .cloned()
            .ok_or_else(|| RegistryError::not_found(format!("image {id} not found")))
    }

    fn create(&self, ctx: &RequestContext, delta: ImageDelta) -> Result<Image, RegistryError> {
        let image = Image::from_delta(ctx, delta);
        let mut images = self.write();
        if images.contains_key(&image.id) {
            return Err(RegistryError::Conflict(format!(
                "image {} already exists",
                image.id
            )));
        }
        images.insert(image.id, image.clone());
        Ok(image)
    }

    fn update(
        &self,
        ctx: &RequestContext,
        id: &ImageId,
        delta: ImageDelta,
    ) -> Result<Image, RegistryError> {
        let mut images = self.write();
        let image = images
            .get_mut(id)
            .filter(|image| !image.deleted && image.visible_to(ctx))
            .ok_or_else(|| RegistryError::not_found(format!("image {id} not found")))?;
        image.apply_delta(delta);
        Ok(image.clone())
    }

    fn soft_delete(&self, ctx: &RequestContext, id: &ImageId) -> Result<(), RegistryError> {
        let mut images = self.write();
        let image = images
            .get_mut(id)
            .filter(|image| !image.deleted && image.visible_to(ctx))
            .ok_or_else(|| RegistryError::not_found(format!("image {id} not found")))?;
        if image.protected {
            return Err(RegistryError::forbidden(format!(
                "image {id} is protected and cannot be deleted"
            )));
        }
        let now = Timestamp::now();
        image.deleted = true;
        image.deleted_at = Some(now);
        image.status = ImageStatus::Deleted;
        image.updated_at = now;
        Ok(())
    }
}

/// In-memory byte store keyed by locator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed bytes at a locator.
    pub fn put(&self, locator: impl Into<String>, bytes: Vec<u8>) {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(locator.into(), bytes);
    }

    /// Whether any bytes are stored at the locator.
    pub fn contains(&self, locator: &str) -> bool {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        blobs.contains_key(locator)
    }
}

impl ImageStore for MemoryStore {
    fn delete(&self, _ctx: &RequestContext, locator: &str) -> Result<(), RegistryError> {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs
            .remove(locator)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_found(format!("no bytes at locator {locator}")))
    }
}
