//! # Sleuth Core
//!
//! Domain types, traits, and error definitions for the Sleuth research agent.
//! This crate has **no I/O of its own**. It defines the domain model that
//! the provider, tool, memory, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the planning loop is a trait here:
//! - [`Provider`]: the language model, an opaque prompt → text capability
//! - [`Tool`]: an external capability, an opaque query → text call that may fail
//! - [`ConversationMemory`]: the log of past query/answer pairs
//!
//! Implementations live in their respective crates, so tests can swap in
//! scripted mocks without touching the loop.

pub mod error;
pub mod event;
pub mod memory;
pub mod message;
pub mod provider;
pub mod research;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ExtractionError, MemoryError, ProviderError, RoundError, ToolError};
pub use event::{DomainEvent, EventBus, RoundStage};
pub use memory::{ConversationMemory, ExchangeRecord};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use research::{ResearchOutcome, ResearchResult};
pub use tool::{Tool, ToolRegistry};
