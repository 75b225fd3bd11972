//! Transactional creation of a supplier together with its address, primary
//! contact and category links.
//!
//! [`SupplierFullService::create_full`] runs every write inside one
//! transaction obtained from the supplier collaborator:
//! 1. Create the supplier
//! 2. Stamp its id on the address, validate and create the address
//! 3. Validate and create the contact
//! 4. Validate and create one relation per category, in input order
//! 5. Commit
//!
//! Any failure rolls the transaction back exactly once. A [`TxGuard`] aborts
//! the transaction if the call panics or its future is dropped.

pub mod error;
pub mod full_creation;
pub mod guard;

pub use error::{CreateFullError, Result, Step};
pub use full_creation::{SupplierFullCreator, SupplierFullService};
pub use guard::TxGuard;
