//! Storage layer
//!
//! Prompt templates and usage records sit behind traits with in-memory
//! implementations. State is process-local and rebuilt on restart; a
//! durable backend can be substituted without touching the handlers.

pub mod prompts;
pub mod usage;

pub use prompts::{MemoryPromptStore, NewPromptTemplate, PromptStore, PromptTemplate, PromptUpdate};
pub use usage::{MemoryUsageStore, UsageRecord, UsageStore};
