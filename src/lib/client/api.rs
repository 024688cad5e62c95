use async_trait::async_trait;
use thiserror::Error;

use crate::core::{Todo, TodoId, TodoPatch};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// The remote todo collection as the controller sees it.
#[async_trait]
pub trait TodoApi: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn create(&self, text: &str) -> Result<Todo, ClientError>;
    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError>;
    async fn delete(&self, id: &TodoId) -> Result<(), ClientError>;
    async fn delete_all(&self) -> Result<(), ClientError>;
}
