//! Routing core: provider adapters, selection strategies, quotas

pub mod factory;
pub mod providers;
pub mod quota;
pub mod router;
pub mod types;
