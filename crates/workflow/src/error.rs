//! Full-creation error types.

use domain::ValidationError;
use store::StoreError;
use thiserror::Error;

/// The write a persistence failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Supplier,
    Address,
    Contact,
    CategoryRelation,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Step::Supplier => "supplier",
            Step::Address => "address",
            Step::Contact => "contact",
            Step::CategoryRelation => "category relation",
        })
    }
}

/// Errors returned by [`SupplierFullService::create_full`](crate::SupplierFullService::create_full).
///
/// Any of these means nothing from the call was committed.
#[derive(Debug, Error)]
pub enum CreateFullError {
    /// The aggregate was missing or failed validation. No transaction was begun.
    #[error("invalid data: {0}")]
    InvalidData(ValidationError),

    /// The transaction could not be started.
    #[error("begin transaction: {0}")]
    TransactionStart(#[source] StoreError),

    /// The provider returned a handle that does not accept writes.
    #[error("invalid transaction: provider returned a closed handle")]
    InvalidTransaction,

    /// A collaborator failed to persist a row.
    #[error("create {step}: {source}")]
    Persistence { step: Step, source: StoreError },

    /// The address failed validation after the supplier id was stamped on it.
    #[error("address invalid: {0}")]
    AddressInvalid(ValidationError),

    #[error("contact invalid: {0}")]
    ContactInvalid(ValidationError),

    #[error("category relation invalid: {0}")]
    CategoryRelationInvalid(ValidationError),

    /// Every step succeeded but the commit did not.
    #[error("commit failed: {0}")]
    CommitFailed(#[source] StoreError),

    /// Rolling back after `cause` failed as well.
    #[error("{cause}; rollback failed: {rollback}")]
    RollbackFailed {
        cause: Box<CreateFullError>,
        rollback: StoreError,
    },
}

impl CreateFullError {
    pub(crate) fn persistence(step: Step) -> impl FnOnce(StoreError) -> Self {
        move |source| CreateFullError::Persistence { step, source }
    }

    /// Short label used for the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            CreateFullError::InvalidData(_) => "invalid_data",
            CreateFullError::TransactionStart(_) => "transaction_start",
            CreateFullError::InvalidTransaction => "invalid_transaction",
            CreateFullError::Persistence { .. } => "persistence",
            CreateFullError::AddressInvalid(_) => "address_invalid",
            CreateFullError::ContactInvalid(_) => "contact_invalid",
            CreateFullError::CategoryRelationInvalid(_) => "category_relation_invalid",
            CreateFullError::CommitFailed(_) => "commit_failed",
            CreateFullError::RollbackFailed { .. } => "rollback_failed",
        }
    }

    /// True when the caller sent something that can never succeed as is.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CreateFullError::InvalidData(_)
                | CreateFullError::AddressInvalid(_)
                | CreateFullError::ContactInvalid(_)
                | CreateFullError::CategoryRelationInvalid(_)
        )
    }
}

/// Convenience type alias for full-creation results.
pub type Result<T> = std::result::Result<T, CreateFullError>;
