//! Taskwise Domain Layer
//!
//! Core value types shared by every other Taskwise crate. Nothing in here
//! talks to the network or to a clock it was not handed explicitly.
//!
//! ## Key Concepts
//!
//! - **ExtractedTask**: Untrusted, loosely-typed output of the language model
//! - **RepairedTask**: The same record with every invariant enforced
//! - **Priority**: `high`, `medium` or `low`
//! - **Todo**: A task as the caller stores it (id, owner, completion state)
//! - **Reference date**: The "today" used to resolve relative dates
//! - **TodoAnalysis**: Completion statistics for a day or a week of todos
//!
//! ## Architecture
//!
//! - Pure data and pure functions only
//! - Infrastructure (LLM providers, HTTP) lives in other crates
//! - Trait definitions for external interactions live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod clock;
pub mod listing;
pub mod priority;
pub mod store;
pub mod task;
pub mod todo;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisPeriod, TodoAnalysis};
pub use clock::{weekday_name, Clock};
pub use listing::{SortKey, StatusFilter, TodoQuery, TodoStats};
pub use priority::Priority;
pub use store::{InMemoryTodoStore, StoreError};
pub use task::{ExtractedTask, RepairedTask};
pub use todo::{Todo, TodoId};
