use std::sync::Arc;

use anyhow::Context;
use tools_api::config::ServerConfig;
use tools_api::server;
use tools_api::store::{LibSqlBackend, ToolStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    eprintln!("🔧 Tools API v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   REST: http://{}{}", config.address(), config.base_path);
    eprintln!("   Health: http://{}/health", config.address());

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn ToolStore> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );
    eprintln!("   Database: {}\n", config.db_path.display());

    server::serve(&config, store, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    })
    .await?;

    Ok(())
}
