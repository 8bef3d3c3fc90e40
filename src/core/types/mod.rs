//! Shared type definitions for the routing core

pub mod health;
pub mod request;
pub mod response;
pub mod stats;

pub use health::{HealthState, ProviderHealth};
pub use request::GenerationRequest;
pub use response::{GenerationResponse, TokenUsage};
pub use stats::ProviderStats;
