//! HTTP server assembly — mounts the tool routes, health check, and layers.

use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{self, ConfigError};
use crate::store::ToolStore;
use crate::tools::{ToolState, tool_routes};

/// Build the full application router.
///
/// Tool routes are mounted under `config.base_path`; `/health` always sits at
/// the root.
pub fn build_router(
    config: &ServerConfig,
    store: Arc<dyn ToolStore>,
) -> Result<Router, ConfigError> {
    let tools = tool_routes(ToolState::new(store));

    let app = Router::new().route("/health", get(health));
    let app = if config.base_path == "/" {
        app.merge(tools)
    } else {
        app.nest(&config.base_path, tools)
    };

    Ok(app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors_origins)?),
    ))
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
                    key: "TOOLS_API_CORS_ORIGINS".to_string(),
                    message: format!("{origin:?}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tools-api"
    }))
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve(
    config: &ServerConfig,
    store: Arc<dyn ToolStore>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> error::Result<()> {
    let app = build_router(config, store)?;
    let listener = TcpListener::bind(config.address()).await?;

    info!(
        addr = %config.address(),
        base_path = %config.base_path,
        "Tools API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Tools API stopped");
    Ok(())
}
