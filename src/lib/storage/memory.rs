use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{validate_text, Todo, TodoError, TodoId, TodoPatch};

use super::Storage;

/// Process-local store. Used by tests and when no database is configured;
/// contents vanish with the process.
#[derive(Default)]
pub struct MemoryStorage {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.todos.read().await.clone())
    }

    async fn create(&self, text: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(validate_text(text)?);
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update_by_id(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, TodoError> {
        patch.validate()?;
        let mut todos = self.todos.write().await;
        let todo = todos
            .iter_mut()
            .find(|todo| &todo.id == id)
            .ok_or_else(|| TodoError::NotFound(id.clone()))?;
        todo.apply(patch);
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), TodoError> {
        let mut todos = self.todos.write().await;
        let index = todos
            .iter()
            .position(|todo| &todo.id == id)
            .ok_or_else(|| TodoError::NotFound(id.clone()))?;
        todos.remove(index);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), TodoError> {
        self.todos.write().await.clear();
        Ok(())
    }
}
