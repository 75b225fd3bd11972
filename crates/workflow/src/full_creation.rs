//! The full-supplier creation workflow.

use std::time::Instant;

use async_trait::async_trait;
use domain::{
    Address, Category, Contact, Supplier, SupplierCategoryRelation, SupplierFull, ValidationError,
};
use store::{
    AddressCreator, CategoryRelationCreator, ContactCreator, SupplierCreator, TransactionProvider,
    TxHandle,
};

use crate::error::{CreateFullError, Result, Step};
use crate::guard::TxGuard;

/// Creates a supplier with its address, contact and category links as one
/// all-or-nothing unit.
///
/// The supplier collaborator also provides the transaction; the other three
/// collaborators write through the same handle type.
pub struct SupplierFullService<S, A, C, R> {
    suppliers: S,
    addresses: A,
    contacts: C,
    relations: R,
}

impl<S: Clone> SupplierFullService<S, S, S, S> {
    /// Uses one store for the transaction and all four writes.
    pub fn from_store(store: S) -> Self {
        Self {
            suppliers: store.clone(),
            addresses: store.clone(),
            contacts: store.clone(),
            relations: store,
        }
    }
}

impl<S, A, C, R> SupplierFullService<S, A, C, R>
where
    S: TransactionProvider + SupplierCreator<S::Tx>,
    A: AddressCreator<S::Tx>,
    C: ContactCreator<S::Tx>,
    R: CategoryRelationCreator<S::Tx>,
{
    pub fn new(suppliers: S, addresses: A, contacts: C, relations: R) -> Self {
        Self {
            suppliers,
            addresses,
            contacts,
            relations,
        }
    }

    /// Persists every part of `full` in one transaction.
    ///
    /// Returns the persisted supplier, address and contact with the category
    /// list as given. On error nothing was committed and the call is safe to
    /// retry as a whole.
    #[tracing::instrument(skip_all, fields(operation_id = %uuid::Uuid::new_v4()))]
    pub async fn create_full(&self, full: Option<SupplierFull>) -> Result<SupplierFull> {
        let started = Instant::now();
        let outcome = self.execute(full).await;
        metrics::histogram!("supplier_full_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &outcome {
            Ok(created) => {
                metrics::counter!("supplier_full_created_total").increment(1);
                tracing::info!(
                    supplier_id = created.supplier.as_ref().map(|s| s.id),
                    categories = created.categories.len(),
                    "supplier created"
                );
            }
            Err(e) => {
                metrics::counter!("supplier_full_failed_total", "reason" => e.reason())
                    .increment(1);
                tracing::warn!(error = %e, "supplier creation failed");
            }
        }
        outcome
    }

    async fn execute(&self, full: Option<SupplierFull>) -> Result<SupplierFull> {
        let full =
            full.ok_or_else(|| CreateFullError::InvalidData(ValidationError::required("body")))?;
        full.validate().map_err(CreateFullError::InvalidData)?;

        let SupplierFull {
            supplier: Some(supplier),
            address: Some(address),
            contact: Some(contact),
            categories,
        } = full
        else {
            return Err(CreateFullError::InvalidData(ValidationError::required(
                "supplier",
            )));
        };

        let tx = self
            .suppliers
            .begin_tx()
            .await
            .map_err(CreateFullError::TransactionStart)?;
        if !tx.is_open() {
            return Err(CreateFullError::InvalidTransaction);
        }

        let mut guard = TxGuard::new(tx);
        let outcome = self
            .run_steps(&mut guard, supplier, address, contact, &categories)
            .await;
        let (supplier, address, contact) = finish(guard, outcome).await?;

        Ok(SupplierFull::new(supplier, address, contact, categories))
    }

    async fn run_steps(
        &self,
        tx: &mut S::Tx,
        supplier: Supplier,
        mut address: Address,
        contact: Contact,
        categories: &[Category],
    ) -> Result<(Supplier, Address, Contact)> {
        let supplier = self
            .suppliers
            .create_supplier_tx(tx, &supplier)
            .await
            .map_err(CreateFullError::persistence(Step::Supplier))?;
        tracing::debug!(supplier_id = supplier.id, "supplier row created");

        address.supplier_id = supplier.id;
        address.validate().map_err(CreateFullError::AddressInvalid)?;
        let address = self
            .addresses
            .create_address_tx(tx, &address)
            .await
            .map_err(CreateFullError::persistence(Step::Address))?;

        contact.validate().map_err(CreateFullError::ContactInvalid)?;
        let contact = self
            .contacts
            .create_contact_tx(tx, &contact)
            .await
            .map_err(CreateFullError::persistence(Step::Contact))?;

        for category in categories {
            let relation = SupplierCategoryRelation::new(supplier.id, category.id);
            relation
                .validate()
                .map_err(CreateFullError::CategoryRelationInvalid)?;
            self.relations
                .create_relation_tx(tx, &relation)
                .await
                .map_err(CreateFullError::persistence(Step::CategoryRelation))?;
        }

        Ok((supplier, address, contact))
    }
}

/// Object-safe entry point to the workflow, for callers that pick the store
/// at runtime.
#[async_trait]
pub trait SupplierFullCreator: Send + Sync {
    async fn create_full(&self, full: Option<SupplierFull>) -> Result<SupplierFull>;
}

#[async_trait]
impl<S, A, C, R> SupplierFullCreator for SupplierFullService<S, A, C, R>
where
    S: TransactionProvider + SupplierCreator<S::Tx>,
    A: AddressCreator<S::Tx>,
    C: ContactCreator<S::Tx>,
    R: CategoryRelationCreator<S::Tx>,
{
    async fn create_full(&self, full: Option<SupplierFull>) -> Result<SupplierFull> {
        SupplierFullService::create_full(self, full).await
    }
}

/// Commits when `outcome` is a success, otherwise rolls back. A commit failure
/// is followed by a rollback attempt too.
async fn finish<T: TxHandle, V>(mut guard: TxGuard<T>, outcome: Result<V>) -> Result<V> {
    let cause = match outcome {
        Ok(value) => match guard.commit().await {
            Ok(()) => return Ok(value),
            Err(e) => CreateFullError::CommitFailed(e),
        },
        Err(cause) => cause,
    };
    Err(rollback(&mut guard, cause).await)
}

async fn rollback<T: TxHandle>(guard: &mut TxGuard<T>, cause: CreateFullError) -> CreateFullError {
    metrics::counter!("supplier_full_rollbacks_total").increment(1);
    match guard.rollback().await {
        Ok(()) => {
            tracing::warn!(error = %cause, "transaction rolled back");
            cause
        }
        Err(rollback) => {
            tracing::error!(error = %cause, rollback_error = %rollback, "rollback failed");
            CreateFullError::RollbackFailed {
                cause: Box::new(cause),
                rollback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::TaxDocument;
    use store::{InMemoryStore, Operation};

    #[tokio::test]
    async fn steps_tolerate_an_empty_category_list() {
        let store = InMemoryStore::new();
        let service = SupplierFullService::from_store(store.clone());

        let mut guard = TxGuard::new(store.begin_tx().await.unwrap());
        let outcome = service
            .run_steps(
                &mut guard,
                Supplier::new("Acme", TaxDocument::Cpf("12345678909".into())),
                Address::new("Rua A", "1", "X", "SP", "01310100", "BR"),
                Contact::new("Ana", "a@b.com"),
                &[],
            )
            .await;
        let (supplier, address, _) = finish(guard, outcome).await.unwrap();

        assert_eq!(address.supplier_id, supplier.id);
        assert_eq!(store.relation_count(), 0);
        assert_eq!(store.supplier_count(), 1);
        assert_eq!(store.call_count(Operation::CreateRelation), 0);
    }

    #[tokio::test]
    async fn finish_composes_commit_and_rollback_failures() {
        let store = InMemoryStore::new();
        store.fail_on(Operation::Commit, "commit refused");
        store.fail_on(Operation::Rollback, "connection lost");

        let guard = TxGuard::new(store.begin_tx().await.unwrap());
        let err = finish(guard, Ok(())).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("commit refused"), "{text}");
        assert!(text.contains("connection lost"), "{text}");
        assert_eq!(store.call_count(Operation::Rollback), 1);
    }
}
