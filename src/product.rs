//! Products
//!
//! The tenant-scoped demo entity. A product lives only in its owning
//! tenant's database; it exists here to make the isolation guarantees
//! observable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum stored length of a product name.
pub const MAX_NAME_LEN: usize = 1024;

/// A product owned by one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Product identifier.
    pub id: Uuid,
    /// Product name, at most [`MAX_NAME_LEN`] characters.
    pub name: String,
    /// Identifier of the owning tenant.
    pub tenant_id: String,
}

impl Product {
    /// Create a product with a fresh id.
    pub fn new(name: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tenant_id: tenant_id.into(),
        }
    }
}
