//! # Resource Controller
//!
//! Orchestrates one logical operation per method: policy check first,
//! then the repository and store calls in the order the operation's
//! consistency story requires. The controller never touches the wire;
//! deserialized deltas come in, domain entities and pages go out.

use std::sync::Arc;

use gallery_core::{Image, ImageDelta, ImageId, RegistryError, RequestContext};

use crate::filter::FilterSet;
use crate::page::{paginate, Page, PageConfig, PageRequest};
use crate::policy::{actions, PolicyEnforcer};
use crate::repo::{ImageRepository, ImageStore};

/// The image resource controller.
pub struct ImageController {
    repo: Arc<dyn ImageRepository>,
    store: Arc<dyn ImageStore>,
    policy: Arc<PolicyEnforcer>,
    page_config: PageConfig,
}

impl ImageController {
    pub fn new(
        repo: Arc<dyn ImageRepository>,
        store: Arc<dyn ImageStore>,
        policy: Arc<PolicyEnforcer>,
        page_config: PageConfig,
    ) -> Self {
        Self {
            repo,
            store,
            policy,
            page_config,
        }
    }

    /// List a page of caller-visible records.
    pub fn index(
        &self,
        ctx: &RequestContext,
        filters: &FilterSet,
        request: &PageRequest,
    ) -> Result<Page, RegistryError> {
        self.policy.enforce(ctx, actions::GET_IMAGES)?;
        paginate(self.repo.as_ref(), ctx, filters, request, &self.page_config)
    }

    /// Fetch a single record.
    pub fn show(&self, ctx: &RequestContext, id: &ImageId) -> Result<Image, RegistryError> {
        self.policy.enforce(ctx, actions::GET_IMAGE)?;
        self.repo.get(ctx, id)
    }

    /// Create a record from a validated payload.
    pub fn create(&self, ctx: &RequestContext, delta: ImageDelta) -> Result<Image, RegistryError> {
        self.policy.enforce(ctx, actions::ADD_IMAGE)?;
        if delta.is_public == Some(true) {
            self.policy.enforce(ctx, actions::PUBLICIZE_IMAGE)?;
        }
        self.repo.create(ctx, delta)
    }

    /// Update a record from a validated payload.
    pub fn update(
        &self,
        ctx: &RequestContext,
        id: &ImageId,
        delta: ImageDelta,
    ) -> Result<Image, RegistryError> {
        self.policy.enforce(ctx, actions::MODIFY_IMAGE)?;
        if delta.is_public == Some(true) {
            self.policy.enforce(ctx, actions::PUBLICIZE_IMAGE)?;
        }
        self.repo.update(ctx, id, delta)
    }

    /// Delete a record, removing stored bytes first.
    ///
    /// Bytes go before the record flips to deleted so a failure between
    /// the two steps leaves a record still pointing at nothing, which a
    /// retry of the delete resolves. A store that no longer holds the
    /// bytes is treated as already cleaned up.
    pub fn delete(&self, ctx: &RequestContext, id: &ImageId) -> Result<(), RegistryError> {
        self.policy.enforce(ctx, actions::DELETE_IMAGE)?;
        let image = self.repo.get(ctx, id)?;
        if let Some(locator) = &image.location {
            match self.store.delete(ctx, locator) {
                Ok(()) => {}
                Err(RegistryError::NotFound(_)) => {
                    tracing::warn!(image = %id, locator, "stored bytes already gone");
                }
                Err(err) => return Err(err),
            }
        }
        self.repo.soft_delete(ctx, id)
    }
}
