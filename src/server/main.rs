use anyhow::Context;
use prk_todo::adapters::HttpServer;
use prk_todo::config::ServerConfig;
use prk_todo::storage::MemoryStorage;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = ServerConfig::from_env()?;

    let server = match &config.database_url {
        #[cfg(feature = "storage")]
        Some(url) => {
            let storage = prk_todo::storage::SQLiteStorage::new(url, config.max_connections)
                .await
                .with_context(|| format!("could not open database {url}"))?;
            HttpServer::new(Arc::new(storage), &config).await?
        }
        _ => {
            #[cfg(feature = "tracing")]
            tracing::warn!("DATABASE_URL not set (or storage feature off); todos are kept in memory");
            HttpServer::new(Arc::new(MemoryStorage::new()), &config).await?
        }
    };
    server.run().await.context("server stopped")
}
