//! Categories and the supplier ↔ category relation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation;

/// A supplier category. When referenced from an aggregate only `id` matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// A reference to an existing category by id.
    pub fn reference(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }

    /// Checks a category that is about to be created.
    pub fn validate_new(&self) -> Result<()> {
        validation::non_blank("name", &self.name)?;
        validation::max_chars("name", &self.name, 120)
    }
}

/// Link row between a supplier and one of its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierCategoryRelation {
    #[serde(default)]
    pub id: i64,
    pub supplier_id: i64,
    pub category_id: i64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl SupplierCategoryRelation {
    pub fn new(supplier_id: i64, category_id: i64) -> Self {
        Self {
            id: 0,
            supplier_id,
            category_id,
            created_at: Utc::now(),
        }
    }

    /// Both sides of the link must be positive ids.
    pub fn validate(&self) -> Result<()> {
        validation::positive_id("supplier_id", self.supplier_id)?;
        validation::positive_id("category_id", self.category_id)
    }
}
