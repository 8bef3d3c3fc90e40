//! Provider routing
//!
//! The [`ProviderManager`] owns the adapter registry, per-provider stats
//! and health flags, and applies the configured [`RoutingStrategy`] to
//! each request. Fallback mode walks the registry in registration order.

pub mod manager;
pub mod strategy;

pub use manager::ProviderManager;
pub use strategy::RoutingStrategy;
