//! # PromptForge
//!
//! Backend service for an AI prompt builder. Users draft prompts, have a
//! model improve or generate them, save the results as templates, and
//! share templates with other users.
//!
//! The core is a multi-provider routing layer: provider adapters (OpenAI,
//! Anthropic, and an offline mock) behind a unified trait, a manager that
//! selects among healthy providers using a configurable strategy
//! (round-robin, least-used, lowest-latency, lowest-cost), per-provider
//! usage statistics and health flags, and a fallback mode that walks the
//! registry until a provider succeeds.
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use promptforge::config::Config;
//! use promptforge::core::factory::{self, PromptOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/promptforge.yaml").await?;
//!     let manager = factory::build_manager(&config)?;
//!
//!     let improved = factory::improve_prompt(
//!         &manager,
//!         "write blog post about rust",
//!         PromptOptions::default(),
//!         true,
//!     )
//!     .await?;
//!     println!("{}", improved.content);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use core::factory::{build_manager, generate_prompt, improve_prompt, PromptOptions};
pub use core::providers::{LlmProvider, ProviderError};
pub use core::router::{ProviderManager, RoutingStrategy};
pub use core::types::{GenerationRequest, GenerationResponse, TokenUsage};
pub use utils::error::{GatewayError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
