//! In-memory todo store

use crate::traits::TodoStore;
use crate::{Todo, TodoId};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by [`InMemoryTodoStore`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Todo not found
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    /// A todo with this ID is already stored
    #[error("Duplicate todo: {0}")]
    Duplicate(TodoId),
}

/// Todos held in a map keyed by ID
///
/// IDs are UUIDv7, so iteration order is creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoStore {
    todos: BTreeMap<TodoId, Todo>,
}

impl InMemoryTodoStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos across all users
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Whether the store holds no todos
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

impl TodoStore for InMemoryTodoStore {
    type Error = StoreError;

    fn insert(&mut self, todo: Todo) -> Result<TodoId, Self::Error> {
        let id = todo.id;
        if self.todos.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        self.todos.insert(id, todo);
        Ok(id)
    }

    fn get(&self, id: TodoId) -> Result<Option<Todo>, Self::Error> {
        Ok(self.todos.get(&id).cloned())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Todo>, Self::Error> {
        Ok(self
            .todos
            .values()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    fn update(&mut self, todo: Todo) -> Result<(), Self::Error> {
        match self.todos.get_mut(&todo.id) {
            Some(slot) => {
                *slot = todo;
                Ok(())
            }
            None => Err(StoreError::NotFound(todo.id)),
        }
    }

    fn delete(&mut self, id: TodoId) -> Result<Todo, Self::Error> {
        self.todos.remove(&id).ok_or(StoreError::NotFound(id))
    }
}
