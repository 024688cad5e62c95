use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, migrate::MigrateDatabase};

use crate::core::{validate_text, Todo, TodoError, TodoId, TodoPatch};
use crate::storage::Storage;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

pub struct SQLiteStorage {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct TodoRow {
    id: String,
    text: String,
    completed: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: TodoId::from(row.id),
            text: row.text,
            completed: row.completed,
        }
    }
}

impl From<sqlx::Error> for TodoError {
    fn from(err: sqlx::Error) -> Self {
        TodoError::StoreUnavailable(err.to_string())
    }
}

impl SQLiteStorage {
    /// Opens (creating if needed) the database at `url` and migrates it.
    pub async fn new(url: &str, max_connections: u32) -> Result<Self, TodoError> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            #[cfg(feature = "tracing")]
            info!(url = %url, "Creating database");
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database. Pinned to one connection because every
    /// SQLite memory connection is its own database.
    pub async fn new_memory() -> Result<Self, TodoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, TodoError> {
        migrate(&pool).await?;
        Ok(Self { pool })
    }
}

async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await?;
    #[cfg(feature = "tracing")]
    debug!("todos table ready");
    Ok(())
}

#[async_trait]
impl Storage for SQLiteStorage {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let rows: Vec<TodoRow> =
            sqlx::query_as("SELECT id, text, completed FROM todos ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn create(&self, text: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(validate_text(text)?);
        sqlx::query("INSERT INTO todos (id, text, completed) VALUES (?, ?, ?)")
            .bind(todo.id.as_str())
            .bind(&todo.text)
            .bind(todo.completed)
            .execute(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_by_id(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, TodoError> {
        patch.validate()?;
        let row: Option<TodoRow> = sqlx::query_as(
            "UPDATE todos
             SET text = COALESCE(?, text), completed = COALESCE(?, completed)
             WHERE id = ?
             RETURNING id, text, completed",
        )
        .bind(patch.text.as_deref())
        .bind(patch.completed)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Todo::from)
            .ok_or_else(|| TodoError::NotFound(id.clone()))
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), TodoError> {
        sqlx::query("DELETE FROM todos").execute(&self.pool).await?;
        Ok(())
    }
}
