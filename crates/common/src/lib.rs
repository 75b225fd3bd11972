//! Shared value types used across the supplier registry crates.

pub mod types;

pub use types::{Page, PageRequest};
