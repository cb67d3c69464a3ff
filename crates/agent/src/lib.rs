//! The research agent: the heart of Sleuth.
//!
//! The agent follows a **Plan → Act → Observe** cycle:
//!
//! 1. **Prompt** the model with the query, recent history, the tools
//!    already used and their results, and the tools available
//! 2. **Extract** a JSON plan from the free-form answer
//! 3. **Act** on it: update the draft summary and run any newly requested tools
//! 4. **Stop** once the model settles on a summary after enough tools have
//!    run, or when the iteration limit is reached
//!
//! The finished exchange is appended to conversation memory so follow-up
//! questions see it.

pub mod extractor;
pub mod loop_runner;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use extractor::{Plan, extract, parse_plan};
pub use loop_runner::{ResearchAgent, ResearchOptions};
pub use prompt::FORMAT_INSTRUCTIONS;
pub use session::SessionState;
