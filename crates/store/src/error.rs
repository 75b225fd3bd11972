//! Store error type and constraint-violation classification.

use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate {entity}: {constraint}")]
    Duplicate {
        entity: &'static str,
        constraint: String,
    },

    /// A referenced parent row does not exist.
    #[error("foreign key violation on {entity}: {constraint}")]
    ForeignKeyViolation {
        entity: &'static str,
        constraint: String,
    },

    /// The transaction handle was used after commit or rollback.
    #[error("transaction already closed")]
    TransactionClosed,

    /// The backend refused or failed the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies a raw sqlx error raised while writing `entity`.
    pub fn classify(entity: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or("unknown").to_string();
            if db.is_unique_violation() {
                return StoreError::Duplicate { entity, constraint };
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { entity, constraint };
            }
        }
        StoreError::Database(err)
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
