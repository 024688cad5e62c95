pub mod memory;
pub mod seed;
#[cfg(feature = "storage")]
pub mod sqlite;

pub use memory::MemoryStorage;
#[cfg(feature = "storage")]
pub use sqlite::SQLiteStorage;

use async_trait::async_trait;
use crate::core::{Todo, TodoError, TodoId, TodoPatch};

/// Everything the HTTP layer needs from a datastore. Implementations must make
/// each call atomic: a caller never observes half of an update.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError>;
    async fn create(&self, text: &str) -> Result<Todo, TodoError>;
    async fn update_by_id(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, TodoError>;
    async fn delete_by_id(&self, id: &TodoId) -> Result<(), TodoError>;
    async fn delete_all(&self) -> Result<(), TodoError>;
}
