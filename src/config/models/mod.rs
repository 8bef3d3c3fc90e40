//! Configuration model structs

pub mod provider;
pub mod quota;
pub mod router;
pub mod server;

pub use provider::ProviderSettings;
pub use quota::QuotaConfig;
pub use router::RouterConfig;
pub use server::{CorsConfig, ServerConfig};
