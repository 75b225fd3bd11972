//! Full-creation workflow against PostgreSQL.
//!
//! Run with:
//!
//! ```bash
//! cargo test -p workflow --test postgres_workflow -- --test-threads=1
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use common::PageRequest;
use domain::{Address, Category, Contact, Supplier, SupplierFull, TaxDocument};
use serial_test::serial;
use store::{
    CategoryRelationCreator, CategoryRepository, PgTx, PostgresStore, StoreError, SupplierReader,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use workflow::{CreateFullError, Step, SupplierFullService};

struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let pool = sqlx::PgPool::connect(&connection_string).await.unwrap();
            PostgresStore::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// A store on emptied tables, seeded with two categories.
async fn get_test_store() -> (PostgresStore, Vec<Category>) {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query(
        "TRUNCATE TABLE supplier_categories, addresses, contacts, suppliers, categories RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .unwrap();

    let store = PostgresStore::new(pool);
    let mut categories = Vec::new();
    for name in ["Packaging", "Logistics"] {
        categories.push(
            store
                .create_category(&Category::new(0, name))
                .await
                .unwrap(),
        );
    }
    (store, categories)
}

fn acme(categories: &[Category]) -> SupplierFull {
    SupplierFull::new(
        Supplier::new("Acme", TaxDocument::Cnpj("11.222.333/0001-81".into())),
        Address::new("Rua A", "100", "X", "SP", "01310-100", "BR"),
        Contact::new("Ana", "a@b.com"),
        categories
            .iter()
            .map(|c| Category::reference(c.id))
            .collect(),
    )
}

async fn table_count(store: &PostgresStore, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

async fn assert_nothing_persisted(store: &PostgresStore) {
    for table in ["suppliers", "addresses", "contacts", "supplier_categories"] {
        assert_eq!(table_count(store, table).await, 0, "{table} not empty");
    }
}

#[tokio::test]
#[serial]
async fn creates_all_rows_in_one_transaction() {
    let (store, categories) = get_test_store().await;
    let service = SupplierFullService::from_store(store.clone());

    let created = service.create_full(Some(acme(&categories))).await.unwrap();

    let supplier = created.supplier.unwrap();
    assert_eq!(created.address.unwrap().supplier_id, supplier.id);
    assert!(created.contact.unwrap().id > 0);
    assert_eq!(
        store.list_category_ids(supplier.id).await.unwrap(),
        categories.iter().map(|c| c.id).collect::<Vec<_>>()
    );
    assert_eq!(
        store.list_suppliers(PageRequest::default()).await.unwrap().total,
        1
    );
}

#[tokio::test]
#[serial]
async fn unknown_category_rolls_back_earlier_rows() {
    let (store, categories) = get_test_store().await;
    let service = SupplierFullService::from_store(store.clone());
    let mut full = acme(&categories);
    full.categories.push(Category::reference(999_999));

    let err = service.create_full(Some(full)).await.unwrap_err();

    assert!(matches!(
        err,
        CreateFullError::Persistence {
            step: Step::CategoryRelation,
            source: StoreError::ForeignKeyViolation { .. }
        }
    ));
    assert_nothing_persisted(&store).await;
}

#[tokio::test]
#[serial]
async fn duplicate_document_leaves_first_supplier_intact() {
    let (store, categories) = get_test_store().await;
    let service = SupplierFullService::from_store(store.clone());
    service.create_full(Some(acme(&categories))).await.unwrap();

    let err = service
        .create_full(Some(acme(&categories)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CreateFullError::Persistence {
            step: Step::Supplier,
            source: StoreError::Duplicate { .. }
        }
    ));
    assert_eq!(table_count(&store, "suppliers").await, 1);
    assert_eq!(table_count(&store, "addresses").await, 1);
}

#[tokio::test]
#[serial]
async fn invalid_contact_rolls_back_supplier_and_address() {
    let (store, categories) = get_test_store().await;
    let service = SupplierFullService::from_store(store.clone());
    let mut full = acme(&categories);
    if let Some(contact) = full.contact.as_mut() {
        contact.email = "broken".into();
    }

    let err = service.create_full(Some(full)).await.unwrap_err();

    assert!(matches!(err, CreateFullError::ContactInvalid(_)));
    assert_nothing_persisted(&store).await;
}

/// Relation writer that fails after the first link.
#[derive(Clone)]
struct FailingRelations {
    inner: PostgresStore,
}

#[async_trait]
impl CategoryRelationCreator<PgTx> for FailingRelations {
    async fn create_relation(
        &self,
        relation: &domain::SupplierCategoryRelation,
    ) -> store::Result<domain::SupplierCategoryRelation> {
        self.inner.create_relation(relation).await
    }

    async fn create_relation_tx(
        &self,
        tx: &mut PgTx,
        relation: &domain::SupplierCategoryRelation,
    ) -> store::Result<domain::SupplierCategoryRelation> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM supplier_categories WHERE supplier_id = $1")
                .bind(relation.supplier_id)
                .fetch_one(tx.conn()?)
                .await?;
        if count >= 1 {
            return Err(StoreError::Unavailable("relation writer down".into()));
        }
        self.inner.create_relation_tx(tx, relation).await
    }
}

#[tokio::test]
#[serial]
async fn failure_on_second_relation_rolls_back_the_first() {
    let (store, categories) = get_test_store().await;
    let service = SupplierFullService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        FailingRelations {
            inner: store.clone(),
        },
    );

    let err = service
        .create_full(Some(acme(&categories)))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "create category relation: store unavailable: relation writer down"
    );
    assert_nothing_persisted(&store).await;
}
