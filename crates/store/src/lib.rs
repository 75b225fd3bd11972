//! Persistence for the supplier registry.
//!
//! The crate defines the transaction handle contract shared by every
//! transactional collaborator, the per-entity creator traits, the read-side
//! repositories, and two implementations of all of them:
//! - [`PostgresStore`] backed by sqlx
//! - [`InMemoryStore`] for tests, with fault injection

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod tx;

pub use error::{Result, StoreError};
pub use memory::{FaultAction, InMemoryStore, MemoryTx, Operation};
pub use postgres::{PgTx, PostgresStore};
pub use store::{
    AddressCreator, CategoryRelationCreator, CategoryRepository, ContactCreator, ContactReader,
    SupplierCreator, SupplierReader,
};
pub use tx::{TransactionProvider, TxHandle};
