use crate::core::{TodoError, TodoPatch};
use crate::storage::Storage;

#[cfg(feature = "tracing")]
use tracing::info;

/// `(text, completed)` pairs written by [`seed`].
pub const SAMPLE_TODOS: &[(&str, bool)] = &[
    ("Buy groceries", false),
    ("Walk the dog", true),
    ("Read a chapter of a book", false),
    ("Reply to emails", true),
    ("Water the plants", false),
];

/// Wipes the store and loads [`SAMPLE_TODOS`]. Returns the number written.
pub async fn seed<S: Storage + ?Sized>(storage: &S) -> Result<usize, TodoError> {
    storage.delete_all().await?;
    for (text, completed) in SAMPLE_TODOS {
        let todo = storage.create(text).await?;
        if *completed {
            storage
                .update_by_id(&todo.id, &TodoPatch::completed(true))
                .await?;
        }
    }
    #[cfg(feature = "tracing")]
    info!(count = SAMPLE_TODOS.len(), "Sample data initialized");
    Ok(SAMPLE_TODOS.len())
}
