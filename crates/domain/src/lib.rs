//! Domain layer for the supplier registry.
//!
//! This crate provides the entities persisted by the registry and the pure
//! validators that guard them:
//! - Supplier, Address, Contact, Category and SupplierCategoryRelation
//! - SupplierFull, the transient aggregate consumed by the full-creation workflow
//! - ValidationError, the field-level error every validator returns

pub mod address;
pub mod category;
pub mod contact;
pub mod error;
pub mod supplier;
pub mod supplier_full;
mod validation;

pub use address::Address;
pub use category::{Category, SupplierCategoryRelation};
pub use contact::{Contact, ContactKind};
pub use error::{Result, ValidationError};
pub use supplier::{Supplier, TaxDocument};
pub use supplier_full::SupplierFull;
