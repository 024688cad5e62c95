use anyhow::Context;
use prk_todo::storage::{seed::seed, SQLiteStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set to seed")?;
    let storage = SQLiteStorage::new(&url, 1)
        .await
        .with_context(|| format!("could not open database {url}"))?;
    let count = seed(&storage).await.context("failed to write sample data")?;
    println!("Seeded {count} todos into {url}");
    Ok(())
}
