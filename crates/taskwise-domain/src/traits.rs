//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Todo, TodoId};

/// Trait for storing and retrieving todos
///
/// The in-memory [`crate::store::InMemoryTodoStore`] backs tests and local
/// runs; a database-backed store plugs in at the same seam.
pub trait TodoStore {
    /// Error type for store operations
    type Error;

    /// Insert a new todo
    fn insert(&mut self, todo: Todo) -> Result<TodoId, Self::Error>;

    /// Get a todo by ID
    fn get(&self, id: TodoId) -> Result<Option<Todo>, Self::Error>;

    /// Every todo owned by `user_id`, oldest id first
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Todo>, Self::Error>;

    /// Replace a stored todo with the same ID
    fn update(&mut self, todo: Todo) -> Result<(), Self::Error>;

    /// Remove a todo, returning it
    fn delete(&mut self, id: TodoId) -> Result<Todo, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (taskwise-llm). Calls may block on
/// network I/O; async callers should run them on a blocking thread.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a free-text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a JSON document constrained by `schema`
    ///
    /// `schema` is a JSON response schema. Providers that cannot enforce it
    /// may fall back to plain generation; callers must still validate the
    /// returned document.
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Name of the model behind this provider, for logging and health checks
    fn model_name(&self) -> &str {
        "llm"
    }
}
