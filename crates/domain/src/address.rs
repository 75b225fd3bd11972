//! Supplier address entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::validation;

/// A postal address belonging to a supplier.
///
/// `supplier_id` is a back-reference to the owning supplier. During the
/// full-creation workflow it is stamped after the supplier row exists, so any
/// value supplied by the caller is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub supplier_id: i64,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub city: String,
    /// Two-letter federative unit, e.g. `SP`.
    pub state: String,
    /// Eight-digit CEP, hyphen optional.
    pub postal_code: String,
    pub country: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Address {
    /// Creates an unsaved, active address with no owner yet.
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            supplier_id: 0,
            street: street.into(),
            number: number.into(),
            complement: None,
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::positive_id("supplier_id", self.supplier_id)?;
        validation::non_blank("street", &self.street)?;
        validation::non_blank("number", &self.number)?;
        validation::non_blank("city", &self.city)?;
        if self.state.len() != 2 || !self.state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::new(
                "state",
                "must be a two-letter state code",
            ));
        }
        validation::digit_count("postal_code", &self.postal_code, &[8])?;
        validation::non_blank("country", &self.country)?;
        Ok(())
    }
}
