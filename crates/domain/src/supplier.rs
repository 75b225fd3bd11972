//! Supplier entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::validation;

/// Maximum length of a supplier's name.
pub const MAX_NAME_LEN: usize = 255;

/// The tax document identifying a supplier: an individual's CPF or a
/// company's CNPJ. A supplier carries exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum TaxDocument {
    Cpf(String),
    Cnpj(String),
}

impl TaxDocument {
    /// Column-friendly discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            TaxDocument::Cpf(_) => "cpf",
            TaxDocument::Cnpj(_) => "cnpj",
        }
    }

    /// The document number as supplied.
    pub fn number(&self) -> &str {
        match self {
            TaxDocument::Cpf(n) | TaxDocument::Cnpj(n) => n,
        }
    }

    /// The document number with punctuation removed, if it is well-formed.
    pub fn normalized(&self) -> Option<String> {
        validation::digits(self.number())
    }

    /// Rebuilds a document from its stored `(kind, number)` pair.
    pub fn from_parts(kind: &str, number: impl Into<String>) -> Option<Self> {
        match kind {
            "cpf" => Some(TaxDocument::Cpf(number.into())),
            "cnpj" => Some(TaxDocument::Cnpj(number.into())),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            TaxDocument::Cpf(n) => validation::digit_count("cpf", n, &[11]),
            TaxDocument::Cnpj(n) => validation::digit_count("cnpj", n, &[14]),
        }
    }
}

impl std::fmt::Display for TaxDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.number())
    }
}

/// A supplier record.
///
/// `id` is zero until the row has been persisted; the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub document: TaxDocument,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_version")]
    pub version: i32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

fn default_version() -> i32 {
    1
}

impl Supplier {
    /// Creates an unsaved, active supplier at version 1.
    pub fn new(name: impl Into<String>, document: TaxDocument) -> Self {
        Self {
            id: 0,
            name: name.into(),
            document,
            active: true,
            version: 1,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Returns true once the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Checks the supplier's own fields.
    pub fn validate(&self) -> Result<()> {
        validation::non_blank("name", &self.name)?;
        validation::max_chars("name", &self.name, MAX_NAME_LEN)?;
        self.document.validate()?;
        if self.version < 1 {
            return Err(ValidationError::new(
                "version",
                format!("must be at least 1, got {}", self.version),
            ));
        }
        Ok(())
    }
}
