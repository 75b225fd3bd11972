//! HTTP route handlers.

pub mod categories;
pub mod contacts;
pub mod health;
pub mod metrics;
pub mod suppliers;
