//! # Request Context
//!
//! The caller identity threaded into every operation. Authentication and
//! identity issuance are out of scope; this type only carries what the
//! transport layer already resolved.

use serde::{Deserialize, Serialize};

use crate::identity::TenantId;

/// Per-request caller identity.
///
/// Visibility rules use `tenant` and `is_admin`: an admin sees every
/// record, a tenant sees public records and its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Opaque user identifier, if the transport resolved one.
    pub user: Option<String>,
    /// Tenant the caller acts for. New records are owned by this tenant.
    pub tenant: Option<TenantId>,
    /// Administrative callers bypass visibility restrictions.
    pub is_admin: bool,
}

impl RequestContext {
    /// A context for a regular tenant-scoped caller.
    pub fn for_tenant(user: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            tenant: Some(TenantId::new(tenant)),
            is_admin: false,
        }
    }

    /// An administrative context with full visibility.
    pub fn admin() -> Self {
        Self {
            user: None,
            tenant: None,
            is_admin: true,
        }
    }

    /// An unauthenticated context. Sees public records only.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_context() {
        let ctx = RequestContext::for_tenant("user-1", "tenant-1");
        assert_eq!(ctx.tenant.as_ref().unwrap().as_str(), "tenant-1");
        assert!(!ctx.is_admin);
    }

    #[test]
    fn test_admin_context() {
        let ctx = RequestContext::admin();
        assert!(ctx.is_admin);
        assert!(ctx.tenant.is_none());
    }
}
