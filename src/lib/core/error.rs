use thiserror::Error;

use crate::core::TodoId;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Todo {0} not found")]
    NotFound(TodoId),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}
