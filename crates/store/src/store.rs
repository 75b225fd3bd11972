//! Per-entity creator traits and the read-side repositories.

use async_trait::async_trait;
use common::{Page, PageRequest};
use domain::{Address, Category, Contact, Supplier, SupplierCategoryRelation};

use crate::Result;
use crate::tx::TxHandle;

/// Persists suppliers.
///
/// The returned supplier carries the id and timestamps assigned by the store.
#[async_trait]
pub trait SupplierCreator<Tx: TxHandle>: Send + Sync {
    /// Inserts a supplier in its own implicit transaction.
    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier>;

    /// Inserts a supplier inside the caller's transaction.
    async fn create_supplier_tx(&self, tx: &mut Tx, supplier: &Supplier) -> Result<Supplier>;
}

/// Persists supplier addresses.
#[async_trait]
pub trait AddressCreator<Tx: TxHandle>: Send + Sync {
    async fn create_address(&self, address: &Address) -> Result<Address>;

    async fn create_address_tx(&self, tx: &mut Tx, address: &Address) -> Result<Address>;
}

/// Persists contacts.
#[async_trait]
pub trait ContactCreator<Tx: TxHandle>: Send + Sync {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact>;

    async fn create_contact_tx(&self, tx: &mut Tx, contact: &Contact) -> Result<Contact>;
}

/// Persists supplier ↔ category links.
#[async_trait]
pub trait CategoryRelationCreator<Tx: TxHandle>: Send + Sync {
    async fn create_relation(
        &self,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation>;

    async fn create_relation_tx(
        &self,
        tx: &mut Tx,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation>;
}

/// Read side for suppliers and the rows hanging off them.
#[async_trait]
pub trait SupplierReader: Send + Sync {
    async fn find_supplier(&self, id: i64) -> Result<Option<Supplier>>;

    /// Lists suppliers ordered by id.
    async fn list_suppliers(&self, page: PageRequest) -> Result<Page<Supplier>>;

    async fn find_address_by_supplier(&self, supplier_id: i64) -> Result<Option<Address>>;

    /// Category ids linked to a supplier, in link order.
    async fn list_category_ids(&self, supplier_id: i64) -> Result<Vec<i64>>;
}

#[async_trait]
pub trait ContactReader: Send + Sync {
    async fn find_contact(&self, id: i64) -> Result<Option<Contact>>;
}

/// Category catalogue.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, category: &Category) -> Result<Category>;

    async fn find_category(&self, id: i64) -> Result<Option<Category>>;

    /// All categories ordered by id.
    async fn list_categories(&self) -> Result<Vec<Category>>;
}
