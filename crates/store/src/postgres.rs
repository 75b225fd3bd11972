//! PostgreSQL store backed by a sqlx connection pool.

use async_trait::async_trait;
use common::{Page, PageRequest};
use domain::{
    Address, Category, Contact, ContactKind, Supplier, SupplierCategoryRelation, TaxDocument,
};
use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    Result, StoreError,
    store::{
        AddressCreator, CategoryRelationCreator, CategoryRepository, ContactCreator, ContactReader,
        SupplierCreator, SupplierReader,
    },
    tx::{TransactionProvider, TxHandle},
};

/// Bootstrap schema applied by [`PostgresStore::run_migrations`].
pub const SCHEMA_SQL: &str = include_str!("../../../migrations/001_create_supplier_tables.sql");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Open,
    Committed,
    RolledBack,
    /// Commit was attempted and failed. sqlx drops the transaction on a failed
    /// commit, which rolls it back on the connection.
    CommitFailed,
}

/// Transaction handle over a pooled PostgreSQL connection.
pub struct PgTx {
    inner: Option<Transaction<'static, Postgres>>,
    state: TxState,
}

impl PgTx {
    fn new(inner: Transaction<'static, Postgres>) -> Self {
        Self {
            inner: Some(inner),
            state: TxState::Open,
        }
    }

    /// The connection writes are issued on.
    pub fn conn(&mut self) -> Result<&mut PgConnection> {
        self.inner
            .as_deref_mut()
            .ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl TxHandle for PgTx {
    fn is_open(&self) -> bool {
        self.state == TxState::Open && self.inner.is_some()
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self.inner.take().ok_or(StoreError::TransactionClosed)?;
        match tx.commit().await {
            Ok(()) => {
                self.state = TxState::Committed;
                metrics::counter!("store_transactions_total", "outcome" => "commit").increment(1);
                Ok(())
            }
            Err(e) => {
                self.state = TxState::CommitFailed;
                metrics::counter!("store_transactions_total", "outcome" => "commit_failed")
                    .increment(1);
                Err(StoreError::Database(e))
            }
        }
    }

    async fn rollback(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(tx) => {
                self.state = TxState::RolledBack;
                metrics::counter!("store_transactions_total", "outcome" => "rollback").increment(1);
                tx.rollback().await?;
                Ok(())
            }
            // The driver already discarded the failed commit.
            None if self.state == TxState::CommitFailed => {
                self.state = TxState::RolledBack;
                Ok(())
            }
            None => Err(StoreError::TransactionClosed),
        }
    }

    fn abort(&mut self) {
        // Dropping an open sqlx transaction queues a ROLLBACK on its connection.
        if self.inner.take().is_some() {
            self.state = TxState::RolledBack;
            metrics::counter!("store_transactions_total", "outcome" => "abort").increment(1);
            tracing::warn!("transaction aborted without explicit rollback");
        }
    }
}

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the tables if they do not exist yet.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    fn row_to_supplier(row: PgRow) -> Result<Supplier> {
        let kind: String = row.try_get("document_kind")?;
        let number: String = row.try_get("document_number")?;
        let document = TaxDocument::from_parts(&kind, number).ok_or_else(|| {
            StoreError::Database(sqlx::Error::Decode(
                format!("unknown document kind '{kind}'").into(),
            ))
        })?;

        Ok(Supplier {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            document,
            active: row.try_get("active")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_address(row: PgRow) -> Result<Address> {
        Ok(Address {
            id: row.try_get("id")?,
            supplier_id: row.try_get("supplier_id")?,
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            complement: row.try_get("complement")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
            active: row.try_get("active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_contact(row: PgRow) -> Result<Contact> {
        let kind: String = row.try_get("kind")?;
        let kind: ContactKind = kind
            .parse()
            .map_err(|e: domain::ValidationError| sqlx::Error::Decode(e.to_string().into()))?;

        Ok(Contact {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            cell: row.try_get("cell")?,
            kind,
            created_at: row.try_get("created_at")?,
        })
    }
}

async fn insert_supplier<'e>(exec: impl PgExecutor<'e>, supplier: &Supplier) -> Result<Supplier> {
    let number = supplier
        .document
        .normalized()
        .unwrap_or_else(|| supplier.document.number().to_string());

    let row = sqlx::query(
        r#"
        INSERT INTO suppliers (name, document_kind, document_number, active, version, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, document_kind, document_number, active, version, created_at, updated_at
        "#,
    )
    .bind(&supplier.name)
    .bind(supplier.document.kind())
    .bind(number)
    .bind(supplier.active)
    .bind(supplier.version)
    .bind(supplier.created_at)
    .bind(supplier.updated_at)
    .fetch_one(exec)
    .await
    .map_err(|e| StoreError::classify("supplier", e))?;

    PostgresStore::row_to_supplier(row)
}

async fn insert_address<'e>(exec: impl PgExecutor<'e>, address: &Address) -> Result<Address> {
    let row = sqlx::query(
        r#"
        INSERT INTO addresses (supplier_id, street, number, complement, city, state, postal_code, country, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, supplier_id, street, number, complement, city, state, postal_code, country, active, created_at, updated_at
        "#,
    )
    .bind(address.supplier_id)
    .bind(&address.street)
    .bind(&address.number)
    .bind(&address.complement)
    .bind(&address.city)
    .bind(address.state.to_ascii_uppercase())
    .bind(&address.postal_code)
    .bind(&address.country)
    .bind(address.active)
    .bind(address.created_at)
    .bind(address.updated_at)
    .fetch_one(exec)
    .await
    .map_err(|e| StoreError::classify("address", e))?;

    PostgresStore::row_to_address(row)
}

async fn insert_contact<'e>(exec: impl PgExecutor<'e>, contact: &Contact) -> Result<Contact> {
    let row = sqlx::query(
        r#"
        INSERT INTO contacts (name, email, phone, cell, kind, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, email, phone, cell, kind, created_at
        "#,
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.cell)
    .bind(contact.kind.as_str())
    .bind(contact.created_at)
    .fetch_one(exec)
    .await
    .map_err(|e| StoreError::classify("contact", e))?;

    PostgresStore::row_to_contact(row)
}

async fn insert_relation<'e>(
    exec: impl PgExecutor<'e>,
    relation: &SupplierCategoryRelation,
) -> Result<SupplierCategoryRelation> {
    let row = sqlx::query(
        r#"
        INSERT INTO supplier_categories (supplier_id, category_id, created_at)
        VALUES ($1, $2, $3)
        RETURNING id, supplier_id, category_id, created_at
        "#,
    )
    .bind(relation.supplier_id)
    .bind(relation.category_id)
    .bind(relation.created_at)
    .fetch_one(exec)
    .await
    .map_err(|e| StoreError::classify("supplier_category", e))?;

    Ok(SupplierCategoryRelation {
        id: row.try_get("id")?,
        supplier_id: row.try_get("supplier_id")?,
        category_id: row.try_get("category_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl TransactionProvider for PostgresStore {
    type Tx = PgTx;

    async fn begin_tx(&self) -> Result<PgTx> {
        let tx = self.pool.begin().await?;
        Ok(PgTx::new(tx))
    }
}

#[async_trait]
impl SupplierCreator<PgTx> for PostgresStore {
    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier> {
        insert_supplier(&self.pool, supplier).await
    }

    async fn create_supplier_tx(&self, tx: &mut PgTx, supplier: &Supplier) -> Result<Supplier> {
        insert_supplier(tx.conn()?, supplier).await
    }
}

#[async_trait]
impl AddressCreator<PgTx> for PostgresStore {
    async fn create_address(&self, address: &Address) -> Result<Address> {
        insert_address(&self.pool, address).await
    }

    async fn create_address_tx(&self, tx: &mut PgTx, address: &Address) -> Result<Address> {
        insert_address(tx.conn()?, address).await
    }
}

#[async_trait]
impl ContactCreator<PgTx> for PostgresStore {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact> {
        insert_contact(&self.pool, contact).await
    }

    async fn create_contact_tx(&self, tx: &mut PgTx, contact: &Contact) -> Result<Contact> {
        insert_contact(tx.conn()?, contact).await
    }
}

#[async_trait]
impl CategoryRelationCreator<PgTx> for PostgresStore {
    async fn create_relation(
        &self,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation> {
        insert_relation(&self.pool, relation).await
    }

    async fn create_relation_tx(
        &self,
        tx: &mut PgTx,
        relation: &SupplierCategoryRelation,
    ) -> Result<SupplierCategoryRelation> {
        insert_relation(tx.conn()?, relation).await
    }
}

#[async_trait]
impl SupplierReader for PostgresStore {
    async fn find_supplier(&self, id: i64) -> Result<Option<Supplier>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, document_kind, document_number, active, version, created_at, updated_at
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_supplier).transpose()
    }

    async fn list_suppliers(&self, page: PageRequest) -> Result<Page<Supplier>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, name, document_kind, document_number, active, version, created_at, updated_at
            FROM suppliers
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Self::row_to_supplier)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, page, total.max(0) as u64))
    }

    async fn find_address_by_supplier(&self, supplier_id: i64) -> Result<Option<Address>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, supplier_id, street, number, complement, city, state, postal_code, country, active, created_at, updated_at
            FROM addresses
            WHERE supplier_id = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_address).transpose()
    }

    async fn list_category_ids(&self, supplier_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT category_id FROM supplier_categories WHERE supplier_id = $1 ORDER BY id ASC",
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl ContactReader for PostgresStore {
    async fn find_contact(&self, id: i64) -> Result<Option<Contact>> {
        let row: Option<PgRow> = sqlx::query(
            "SELECT id, name, email, phone, cell, kind, created_at FROM contacts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_contact).transpose()
    }
}

#[async_trait]
impl CategoryRepository for PostgresStore {
    async fn create_category(&self, category: &Category) -> Result<Category> {
        let row = sqlx::query("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(&category.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::classify("category", e))?;

        Ok(Category::new(row.try_get("id")?, row.try_get::<String, _>("name")?))
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        let row: Option<PgRow> = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Category::new(
                row.try_get("id")?,
                row.try_get::<String, _>("name")?,
            ))),
            None => Ok(None),
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<Category> {
                Ok(Category::new(
                    row.try_get("id")?,
                    row.try_get::<String, _>("name")?,
                ))
            })
            .collect()
    }
}
