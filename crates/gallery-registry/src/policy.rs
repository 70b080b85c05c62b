//! # Policy Gate
//!
//! A rule table mapping action names to allow/deny, consulted once per
//! logical operation. The table is read-mostly configuration: it is
//! loaded at startup and replaced only by an explicit administrative
//! reload, never mutated inside request handling. Each enforcement takes
//! a snapshot read, so a concurrent reload cannot tear a decision.
//!
//! Absence of a rule means allow; only an explicit deny raises
//! `Forbidden`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use gallery_core::{RegistryError, RequestContext};

/// Action names enforced by the resource controller.
pub mod actions {
    pub const GET_IMAGES: &str = "get_images";
    pub const GET_IMAGE: &str = "get_image";
    pub const ADD_IMAGE: &str = "add_image";
    pub const MODIFY_IMAGE: &str = "modify_image";
    pub const DELETE_IMAGE: &str = "delete_image";
    /// Checked only when a create or update requests `is_public = true`.
    pub const PUBLICIZE_IMAGE: &str = "publicize_image";
}

/// Evaluates named actions against a caller's context.
#[derive(Debug, Default)]
pub struct PolicyEnforcer {
    rules: RwLock<HashMap<String, bool>>,
}

impl PolicyEnforcer {
    /// A gate with no rules: every action allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule table. Administrative operation, not part of
    /// request handling.
    pub fn set_rules(&self, rules: HashMap<String, bool>) {
        let mut table = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        *table = rules;
    }

    /// Enforce a named action for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Forbidden`] when the action is explicitly
    /// denied.
    pub fn enforce(&self, _ctx: &RequestContext, action: &str) -> Result<(), RegistryError> {
        let table = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        if table.get(action) == Some(&false) {
            return Err(RegistryError::forbidden(format!(
                "action '{action}' is not allowed"
            )));
        }
        Ok(())
    }
}
