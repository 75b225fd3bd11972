//! In-memory store with staged transactions and fault injection.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use common::{Page, PageRequest};
use domain::{Address, Category, Contact, Supplier, SupplierCategoryRelation, TaxDocument};

use crate::{
    Result, StoreError,
    store::{
        AddressCreator, CategoryRelationCreator, CategoryRepository, ContactCreator, ContactReader,
        SupplierCreator, SupplierReader,
    },
    tx::{TransactionProvider, TxHandle},
};

/// Store operations recorded in the journal and targetable by faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Begin,
    CreateSupplier,
    CreateAddress,
    CreateContact,
    CreateRelation,
    Commit,
    Rollback,
}

/// What happens when an armed fault fires.
#[derive(Debug, Clone)]
pub enum FaultAction {
    /// The operation returns `StoreError::Unavailable` with this message.
    Fail(String),
    /// The operation panics with this payload.
    Panic(&'static str),
}

#[derive(Debug, Clone)]
struct Fault {
    /// 1-based occurrence of the operation that fires the fault.
    occurrence: usize,
    action: FaultAction,
}

#[derive(Debug, Default, Clone)]
struct Tables {
    suppliers: BTreeMap<i64, Supplier>,
    addresses: BTreeMap<i64, Address>,
    contacts: BTreeMap<i64, Contact>,
    categories: BTreeMap<i64, Category>,
    relations: BTreeMap<i64, SupplierCategoryRelation>,
}

impl Tables {
    /// Re-checks the unique constraints of `staged` against the committed
    /// rows. Another transaction may have committed a clashing row after
    /// `staged` was written.
    fn check_unique(&self, staged: &Tables) -> Result<()> {
        let document_taken = staged
            .suppliers
            .values()
            .any(|s| self.suppliers.values().any(|c| c.document == s.document));
        if document_taken {
            return Err(StoreError::Duplicate {
                entity: "supplier",
                constraint: "unique_supplier_document".to_string(),
            });
        }

        let already_linked = staged.relations.values().any(|r| {
            self.relations
                .values()
                .any(|c| c.supplier_id == r.supplier_id && c.category_id == r.category_id)
        });
        if already_linked {
            return Err(StoreError::Duplicate {
                entity: "supplier_category",
                constraint: "unique_supplier_category".to_string(),
            });
        }
        Ok(())
    }

    fn merge(&mut self, staged: Tables) {
        self.suppliers.extend(staged.suppliers);
        self.addresses.extend(staged.addresses);
        self.contacts.extend(staged.contacts);
        self.categories.extend(staged.categories);
        self.relations.extend(staged.relations);
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    tables: Tables,
    next_id: i64,
    faults: HashMap<Operation, Fault>,
    calls: HashMap<Operation, usize>,
    journal: Vec<Operation>,
    hand_out_closed: bool,
}

impl InMemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Records the call and returns the fault to fire, if any.
    fn enter(&mut self, op: Operation) -> Option<FaultAction> {
        self.journal.push(op);
        let count = self.calls.entry(op).or_default();
        *count += 1;
        let count = *count;
        match self.faults.get(&op) {
            Some(fault) if fault.occurrence == count => Some(fault.action.clone()),
            _ => None,
        }
    }
}

/// Raises an armed fault. Must be called with the state lock released so a
/// panic does not poison it.
fn raise(fault: Option<FaultAction>) -> Result<()> {
    match fault {
        None => Ok(()),
        Some(FaultAction::Fail(message)) => Err(StoreError::Unavailable(message)),
        Some(FaultAction::Panic(payload)) => std::panic::panic_any(payload),
    }
}

/// In-memory store implementation for testing.
///
/// Provides the same contracts as the PostgreSQL implementation, including
/// foreign-key and uniqueness checks. Writes issued through a [`MemoryTx`]
/// are staged on the handle and only become visible on commit. Every call is
/// appended to a journal, and faults can be armed per operation to exercise
/// failure paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryState> {
        lock(&self.state)
    }

    /// Arms a fault on the first call to `op`.
    pub fn fail_on(&self, op: Operation, message: impl Into<String>) {
        self.arm(op, 1, FaultAction::Fail(message.into()));
    }

    /// Arms a fault on the `occurrence`-th call (1-based) to `op`.
    pub fn fail_on_nth(&self, op: Operation, occurrence: usize, message: impl Into<String>) {
        self.arm(op, occurrence, FaultAction::Fail(message.into()));
    }

    /// Makes the first call to `op` panic with `payload`.
    pub fn panic_on(&self, op: Operation, payload: &'static str) {
        self.arm(op, 1, FaultAction::Panic(payload));
    }

    fn arm(&self, op: Operation, occurrence: usize, action: FaultAction) {
        let mut state = self.state();
        let already = state.calls.get(&op).copied().unwrap_or(0);
        state.faults.insert(
            op,
            Fault {
                occurrence: already + occurrence,
                action,
            },
        );
    }

    /// Disarms every fault.
    pub fn clear_faults(&self) {
        let mut state = self.state();
        state.faults.clear();
        state.hand_out_closed = false;
    }

    /// When set, `begin_tx` succeeds but returns a handle that is not open.
    pub fn hand_out_closed_transactions(&self, enabled: bool) {
        self.state().hand_out_closed = enabled;
    }

    /// Every recorded call, in order.
    pub fn journal(&self) -> Vec<Operation> {
        self.state().journal.clone()
    }

    /// Number of recorded calls to `op`.
    pub fn call_count(&self, op: Operation) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn supplier_count(&self) -> usize {
        self.state().tables.suppliers.len()
    }

    pub fn address_count(&self) -> usize {
        self.state().tables.addresses.len()
    }

    pub fn contact_count(&self) -> usize {
        self.state().tables.contacts.len()
    }

    pub fn relation_count(&self) -> usize {
        self.state().tables.relations.len()
    }

    /// Total committed rows across the four supplier tables.
    pub fn supplier_row_count(&self) -> usize {
        let state = self.state();
        state.tables.suppliers.len()
            + state.tables.addresses.len()
            + state.tables.contacts.len()
            + state.tables.relations.len()
    }

    /// Inserts a category with a chosen id.
    pub fn seed_category(&self, id: i64, name: impl Into<String>) {
        let mut state = self.state();
        state.tables.categories.insert(id, Category::new(id, name));
        state.next_id = state.next_id.max(id);
    }

    fn begin(&self) -> Result<MemoryTx> {
        let (fault, closed) = {
            let mut state = self.state();
            (state.enter(Operation::Begin), state.hand_out_closed)
        };
        raise(fault)?;

        Ok(MemoryTx {
            state: Arc::clone(&self.state),
            staged: Tables::default(),
            open: !closed,
        })
    }

    /// Runs `write` in a fresh transaction and commits it, without touching
    /// the journal or faults for begin/commit.
    fn autocommit<T>(&self, write: impl FnOnce(&mut MemoryTx) -> Result<T>) -> Result<T> {
        let mut tx = MemoryTx {
            state: Arc::clone(&self.state),
            staged: Tables::default(),
            open: true,
        };
        let out = write(&mut tx)?;
        let staged = std::mem::take(&mut tx.staged);
        tx.open = false;
        let mut state = self.state();
        state.tables.check_unique(&staged)?;
        state.tables.merge(staged);
        Ok(out)
    }
}

fn lock(state: &Mutex<InMemoryState>) -> MutexGuard<'_, InMemoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transaction handle for [`InMemoryStore`].
#[derive(Debug)]
pub struct MemoryTx {
    state: Arc<Mutex<InMemoryState>>,
    staged: Tables,
    open: bool,
}

impl MemoryTx {
    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::TransactionClosed)
        }
    }

    fn supplier_visible(&self, committed: &Tables, id: i64) -> bool {
        committed.suppliers.contains_key(&id) || self.staged.suppliers.contains_key(&id)
    }

    fn stage_supplier(&mut self, supplier: &Supplier) -> Result<Supplier> {
        self.ensure_open()?;
        let normalized = supplier
            .document
            .normalized()
            .unwrap_or_else(|| supplier.document.number().to_string());
        let document = TaxDocument::from_parts(supplier.document.kind(), normalized)
            .unwrap_or_else(|| supplier.document.clone());

        let mut state = lock(&self.state);
        let taken = state
            .tables
            .suppliers
            .values()
            .chain(self.staged.suppliers.values())
            .any(|s| s.document == document);
        if taken {
            return Err(StoreError::Duplicate {
                entity: "supplier",
                constraint: "unique_supplier_document".to_string(),
            });
        }

        let mut row = supplier.clone();
        row.id = state.next_id();
        row.document = document;
        drop(state);
        self.staged.suppliers.insert(row.id, row.clone());
        Ok(row)
    }

    fn stage_address(&mut self, address: &Address) -> Result<Address> {
        self.ensure_open()?;
        let mut state = lock(&self.state);
        if !self.supplier_visible(&state.tables, address.supplier_id) {
            return Err(StoreError::ForeignKeyViolation {
                entity: "address",
                constraint: "fk_address_supplier".to_string(),
            });
        }

        let mut row = address.clone();
        row.id = state.next_id();
        row.state = row.state.to_ascii_uppercase();
        drop(state);
        self.staged.addresses.insert(row.id, row.clone());
        Ok(row)
    }

    fn stage_contact(&mut self, contact: &Contact) -> Result<Contact> {
        self.ensure_open()?;
        let mut row = contact.clone();
        row.id = lock(&self.state).next_id();
        self.staged.contacts.insert(row.id, row.clone());
        Ok(row)
    }

    fn stage_relation(
        &mut self,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation> {
        self.ensure_open()?;
        let mut state = lock(&self.state);
        if !self.supplier_visible(&state.tables, relation.supplier_id) {
            return Err(StoreError::ForeignKeyViolation {
                entity: "supplier_category",
                constraint: "fk_relation_supplier".to_string(),
            });
        }
        if !state.tables.categories.contains_key(&relation.category_id) {
            return Err(StoreError::ForeignKeyViolation {
                entity: "supplier_category",
                constraint: "fk_relation_category".to_string(),
            });
        }
        let linked = state
            .tables
            .relations
            .values()
            .chain(self.staged.relations.values())
            .any(|r| r.supplier_id == relation.supplier_id && r.category_id == relation.category_id);
        if linked {
            return Err(StoreError::Duplicate {
                entity: "supplier_category",
                constraint: "unique_supplier_category".to_string(),
            });
        }

        let mut row = relation.clone();
        row.id = state.next_id();
        drop(state);
        self.staged.relations.insert(row.id, row.clone());
        Ok(row)
    }

    fn discard(&mut self) {
        self.staged = Tables::default();
        self.open = false;
    }
}

#[async_trait]
impl TxHandle for MemoryTx {
    fn is_open(&self) -> bool {
        self.open
    }

    async fn commit(&mut self) -> Result<()> {
        self.ensure_open()?;
        let fault = lock(&self.state).enter(Operation::Commit);
        raise(fault)?;

        // A clash discards the staged rows but leaves the handle open, so the
        // caller's rollback still succeeds.
        let staged = std::mem::take(&mut self.staged);
        let mut state = lock(&self.state);
        state.tables.check_unique(&staged)?;
        state.tables.merge(staged);
        self.open = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.ensure_open()?;
        let fault = lock(&self.state).enter(Operation::Rollback);
        // Staged writes are gone whatever the outcome.
        self.discard();
        raise(fault)
    }

    fn abort(&mut self) {
        if self.open {
            lock(&self.state).enter(Operation::Rollback);
            self.discard();
        }
    }
}

#[async_trait]
impl TransactionProvider for InMemoryStore {
    type Tx = MemoryTx;

    async fn begin_tx(&self) -> Result<MemoryTx> {
        self.begin()
    }
}

#[async_trait]
impl SupplierCreator<MemoryTx> for InMemoryStore {
    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier> {
        self.autocommit(|tx| tx.stage_supplier(supplier))
    }

    async fn create_supplier_tx(&self, tx: &mut MemoryTx, supplier: &Supplier) -> Result<Supplier> {
        let fault = self.state().enter(Operation::CreateSupplier);
        raise(fault)?;
        tx.stage_supplier(supplier)
    }
}

#[async_trait]
impl AddressCreator<MemoryTx> for InMemoryStore {
    async fn create_address(&self, address: &Address) -> Result<Address> {
        self.autocommit(|tx| tx.stage_address(address))
    }

    async fn create_address_tx(&self, tx: &mut MemoryTx, address: &Address) -> Result<Address> {
        let fault = self.state().enter(Operation::CreateAddress);
        raise(fault)?;
        tx.stage_address(address)
    }
}

#[async_trait]
impl ContactCreator<MemoryTx> for InMemoryStore {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact> {
        self.autocommit(|tx| tx.stage_contact(contact))
    }

    async fn create_contact_tx(&self, tx: &mut MemoryTx, contact: &Contact) -> Result<Contact> {
        let fault = self.state().enter(Operation::CreateContact);
        raise(fault)?;
        tx.stage_contact(contact)
    }
}

#[async_trait]
impl CategoryRelationCreator<MemoryTx> for InMemoryStore {
    async fn create_relation(
        &self,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation> {
        self.autocommit(|tx| tx.stage_relation(relation))
    }

    async fn create_relation_tx(
        &self,
        tx: &mut MemoryTx,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation> {
        let fault = self.state().enter(Operation::CreateRelation);
        raise(fault)?;
        tx.stage_relation(relation)
    }
}

#[async_trait]
impl SupplierReader for InMemoryStore {
    async fn find_supplier(&self, id: i64) -> Result<Option<Supplier>> {
        Ok(self.state().tables.suppliers.get(&id).cloned())
    }

    async fn list_suppliers(&self, page: PageRequest) -> Result<Page<Supplier>> {
        let state = self.state();
        let total = state.tables.suppliers.len() as u64;
        let items = state
            .tables
            .suppliers
            .values()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, page, total))
    }

    async fn find_address_by_supplier(&self, supplier_id: i64) -> Result<Option<Address>> {
        Ok(self
            .state()
            .tables
            .addresses
            .values()
            .find(|a| a.supplier_id == supplier_id)
            .cloned())
    }

    async fn list_category_ids(&self, supplier_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .state()
            .tables
            .relations
            .values()
            .filter(|r| r.supplier_id == supplier_id)
            .map(|r| r.category_id)
            .collect())
    }
}

#[async_trait]
impl ContactReader for InMemoryStore {
    async fn find_contact(&self, id: i64) -> Result<Option<Contact>> {
        Ok(self.state().tables.contacts.get(&id).cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create_category(&self, category: &Category) -> Result<Category> {
        let mut state = self.state();
        if state.tables.categories.values().any(|c| c.name == category.name) {
            return Err(StoreError::Duplicate {
                entity: "category",
                constraint: "unique_category_name".to_string(),
            });
        }
        let id = state.next_id();
        let row = Category::new(id, category.name.clone());
        state.tables.categories.insert(id, row.clone());
        Ok(row)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.state().tables.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.state().tables.categories.values().cloned().collect())
    }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        if self.open {
            tracing::debug!(
                staged_suppliers = self.staged.suppliers.len(),
                "in-memory transaction dropped while open"
            );
            self.staged = Tables::default();
            self.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ContactKind;

    fn supplier(doc: &str) -> Supplier {
        Supplier::new("Acme", TaxDocument::Cpf(doc.to_string()))
    }

    fn address(supplier_id: i64) -> Address {
        let mut a = Address::new("Rua A", "1", "X", "sp", "01310100", "BR");
        a.supplier_id = supplier_id;
        a
    }

    #[tokio::test]
    async fn staged_writes_are_invisible_until_commit() {
        let store = InMemoryStore::new();
        let mut tx = store.begin_tx().await.unwrap();

        let s = store
            .create_supplier_tx(&mut tx, &supplier("12345678909"))
            .await
            .unwrap();
        assert!(s.id > 0);
        assert_eq!(store.supplier_count(), 0);
        assert!(store.find_supplier(s.id).await.unwrap().is_none());

        tx.commit().await.unwrap();
        assert_eq!(store.supplier_count(), 1);
        assert!(!tx.is_open());
    }

    #[tokio::test]
    async fn concurrent_transactions_cannot_both_commit_a_document() {
        let store = InMemoryStore::new();
        let mut first = store.begin_tx().await.unwrap();
        let mut second = store.begin_tx().await.unwrap();

        store
            .create_supplier_tx(&mut first, &supplier("12345678909"))
            .await
            .unwrap();
        store
            .create_supplier_tx(&mut second, &supplier("123.456.789-09"))
            .await
            .unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "supplier", .. }));
        assert_eq!(store.supplier_count(), 1);

        assert!(second.is_open());
        second.rollback().await.unwrap();
        assert_eq!(store.supplier_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_transactions_cannot_both_commit_a_relation() {
        let store = InMemoryStore::new();
        store.seed_category(100, "Packaging");
        let s = store.create_supplier(&supplier("12345678909")).await.unwrap();
        let link = SupplierCategoryRelation::new(s.id, 100);

        let mut first = store.begin_tx().await.unwrap();
        let mut second = store.begin_tx().await.unwrap();
        store.create_relation_tx(&mut first, &link).await.unwrap();
        store.create_relation_tx(&mut second, &link).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate {
                entity: "supplier_category",
                ..
            }
        ));
        assert_eq!(store.relation_count(), 1);
    }

    #[tokio::test]
    async fn rollback_discards_staged_writes() {
        let store = InMemoryStore::new();
        let mut tx = store.begin_tx().await.unwrap();
        let s = store
            .create_supplier_tx(&mut tx, &supplier("12345678909"))
            .await
            .unwrap();
        store.create_address_tx(&mut tx, &address(s.id)).await.unwrap();

        tx.rollback().await.unwrap();
        assert_eq!(store.supplier_row_count(), 0);
        assert!(matches!(
            tx.commit().await,
            Err(StoreError::TransactionClosed)
        ));
    }

    #[tokio::test]
    async fn closed_handle_rejects_writes() {
        let store = InMemoryStore::new();
        let mut tx = store.begin_tx().await.unwrap();
        tx.commit().await.unwrap();

        let err = store
            .create_supplier_tx(&mut tx, &supplier("12345678909"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TransactionClosed));
    }

    #[tokio::test]
    async fn address_requires_existing_supplier() {
        let store = InMemoryStore::new();
        let mut tx = store.begin_tx().await.unwrap();
        let err = store
            .create_address_tx(&mut tx, &address(42))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn address_state_is_uppercased() {
        let store = InMemoryStore::new();
        let s = store.create_supplier(&supplier("12345678909")).await.unwrap();
        let a = store.create_address(&address(s.id)).await.unwrap();
        assert_eq!(a.state, "SP");
    }

    #[tokio::test]
    async fn duplicate_document_is_rejected_after_normalization() {
        let store = InMemoryStore::new();
        store.create_supplier(&supplier("123.456.789-09")).await.unwrap();
        let err = store
            .create_supplier(&supplier("12345678909"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "supplier", .. }));
    }

    #[tokio::test]
    async fn relation_checks_category_and_uniqueness() {
        let store = InMemoryStore::new();
        store.seed_category(100, "Packaging");
        let s = store.create_supplier(&supplier("12345678909")).await.unwrap();

        let missing = store
            .create_relation(&SupplierCategoryRelation::new(s.id, 999))
            .await
            .unwrap_err();
        assert!(matches!(missing, StoreError::ForeignKeyViolation { .. }));

        store
            .create_relation(&SupplierCategoryRelation::new(s.id, 100))
            .await
            .unwrap();
        let dup = store
            .create_relation(&SupplierCategoryRelation::new(s.id, 100))
            .await
            .unwrap_err();
        assert!(matches!(dup, StoreError::Duplicate { .. }));
        assert_eq!(store.list_category_ids(s.id).await.unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn faults_fire_on_the_chosen_occurrence() {
        let store = InMemoryStore::new();
        store.fail_on_nth(Operation::CreateContact, 2, "disk full");

        let mut tx = store.begin_tx().await.unwrap();
        let mut contact = Contact::new("Ana", "a@b.com");
        contact.kind = ContactKind::Financial;
        store.create_contact_tx(&mut tx, &contact).await.unwrap();
        let err = store.create_contact_tx(&mut tx, &contact).await.unwrap_err();
        assert_eq!(err.to_string(), "store unavailable: disk full");
        assert_eq!(store.call_count(Operation::CreateContact), 2);
    }

    #[tokio::test]
    async fn failed_commit_leaves_handle_open_for_rollback() {
        let store = InMemoryStore::new();
        store.fail_on(Operation::Commit, "connection reset");

        let mut tx = store.begin_tx().await.unwrap();
        store
            .create_supplier_tx(&mut tx, &supplier("12345678909"))
            .await
            .unwrap();
        assert!(tx.commit().await.is_err());
        assert!(tx.is_open());

        tx.rollback().await.unwrap();
        assert_eq!(store.supplier_count(), 0);
        assert_eq!(
            store.journal(),
            vec![
                Operation::Begin,
                Operation::CreateSupplier,
                Operation::Commit,
                Operation::Rollback
            ]
        );
    }

    #[tokio::test]
    async fn abort_records_one_rollback() {
        let store = InMemoryStore::new();
        let mut tx = store.begin_tx().await.unwrap();
        tx.abort();
        tx.abort();
        assert_eq!(store.call_count(Operation::Rollback), 1);
        assert!(!tx.is_open());
    }

    #[tokio::test]
    async fn closed_transactions_can_be_handed_out() {
        let store = InMemoryStore::new();
        store.hand_out_closed_transactions(true);
        let tx = store.begin_tx().await.unwrap();
        assert!(!tx.is_open());
    }

    #[tokio::test]
    async fn list_suppliers_pages_by_id() {
        let store = InMemoryStore::new();
        for doc in ["11111111111", "22222222222", "33333333333"] {
            store.create_supplier(&supplier(doc)).await.unwrap();
        }
        let page = store.list_suppliers(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].document.number(), "33333333333");
    }

    #[tokio::test]
    async fn categories_are_unique_by_name() {
        let store = InMemoryStore::new();
        let c = store
            .create_category(&Category::new(0, "Packaging"))
            .await
            .unwrap();
        assert!(c.id > 0);
        assert!(store.create_category(&Category::new(0, "Packaging")).await.is_err());
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }
}
