//! Contact entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::validation;

/// Role of a contact person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    #[default]
    Primary,
    Financial,
    Commercial,
    Technical,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Primary => "primary",
            ContactKind::Financial => "financial",
            ContactKind::Commercial => "commercial",
            ContactKind::Technical => "technical",
        }
    }
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "primary" => Ok(ContactKind::Primary),
            "financial" => Ok(ContactKind::Financial),
            "commercial" => Ok(ContactKind::Commercial),
            "technical" => Ok(ContactKind::Technical),
            other => Err(ValidationError::new(
                "kind",
                format!("unknown contact kind '{other}'"),
            )),
        }
    }
}

/// A contact person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cell: Option<String>,
    #[serde(default)]
    pub kind: ContactKind,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Creates an unsaved primary contact.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            phone: None,
            cell: None,
            kind: ContactKind::Primary,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::non_blank("name", &self.name)?;
        validate_email(&self.email)?;
        if let Some(phone) = &self.phone {
            validation::digit_count("phone", phone, &[10, 11])?;
        }
        if let Some(cell) = &self.cell {
            validation::digit_count("cell", cell, &[10, 11])?;
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<()> {
    validation::non_blank("email", email)?;
    let invalid = || ValidationError::new("email", format!("'{email}' is not a valid address"));

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let mut labels = domain.split('.');
    let well_formed = domain.contains('.') && labels.all(|label| !label.is_empty());
    if !well_formed {
        return Err(invalid());
    }
    Ok(())
}
