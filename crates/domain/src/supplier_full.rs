//! The transient supplier aggregate used by the full-creation workflow.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::{Address, Category, Contact, Supplier};

/// A supplier together with its address, primary contact and categories.
///
/// Not a persisted row: the aggregate only shuttles the related entities
/// through one creation call. Address and contact are validated by the
/// workflow at the point they are persisted, because the address
/// back-reference is only known after the supplier row exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierFull {
    pub supplier: Option<Supplier>,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SupplierFull {
    pub fn new(
        supplier: Supplier,
        address: Address,
        contact: Contact,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            supplier: Some(supplier),
            address: Some(address),
            contact: Some(contact),
            categories,
        }
    }

    /// Aggregate-level checks: every sub-entity present, the supplier valid
    /// on its own, and at least one category.
    pub fn validate(&self) -> Result<()> {
        let supplier = self
            .supplier
            .as_ref()
            .ok_or_else(|| ValidationError::required("supplier"))?;
        if self.address.is_none() {
            return Err(ValidationError::required("address"));
        }
        if self.contact.is_none() {
            return Err(ValidationError::required("contact"));
        }
        if self.categories.is_empty() {
            return Err(ValidationError::new(
                "categories",
                "at least one category is required",
            ));
        }
        supplier.validate()
    }

    /// Ids of the referenced categories, in input order.
    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().map(|c| c.id).collect()
    }
}
