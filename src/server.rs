//! Web server for the map page.
//!
//! Every page load fetches the feed and builds a fresh view; the server
//! keeps no state between requests beyond its configuration.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::client::FeedSource;
use crate::errors::QuakemapError;
use crate::filters::EventFilter;
use crate::map::{MapConfig, MapView, build_map};
use crate::render::render_page;
use crate::scale::DepthScale;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub source: FeedSource,
    pub filter: EventFilter,
    pub map: MapConfig,
    pub scale: DepthScale,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            source: FeedSource::default(),
            filter: EventFilter::default(),
            map: MapConfig::default(),
            scale: DepthScale::default(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/map.json", get(map_json_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState::new(config));

    tracing::info!("🌍 quakemap starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the feed on a blocking thread and build the view.
///
/// Any failure is logged and surfaced to the browser as `502`.
async fn load_view(state: &AppState) -> Result<MapView, Response> {
    let config = Arc::clone(&state.config);
    let built = tokio::task::spawn_blocking(move || -> Result<MapView, QuakemapError> {
        let feed = config.source.load()?;
        let features: Vec<_> = feed
            .features
            .into_iter()
            .filter(|f| config.filter.matches(f))
            .collect();
        build_map(&features, &config.map, &config.scale)
    })
    .await;

    match built {
        Ok(Ok(view)) => Ok(view),
        Ok(Err(e)) => {
            tracing::warn!("map build failed: {}", e);
            Err((StatusCode::BAD_GATEWAY, format!("Failed to load earthquake feed: {e}")).into_response())
        }
        Err(e) => {
            tracing::error!("map build task failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Map page handler.
async fn index_handler(State(state): State<AppState>) -> Response {
    let view = match load_view(&state).await {
        Ok(view) => view,
        Err(resp) => return resp,
    };
    match render_page(&view) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!("page render failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serialized map view, for scripts and debugging.
async fn map_json_handler(State(state): State<AppState>) -> Response {
    match load_view(&state).await {
        Ok(view) => Json(view).into_response(),
        Err(resp) => resp,
    }
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn state_for(path: PathBuf) -> AppState {
        AppState::new(ServerConfig {
            source: FeedSource::File(path),
            ..ServerConfig::default()
        })
    }

    fn sample_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tools/sample_4.5_month.geojson")
    }

    /// Serve the router on an ephemeral port and issue one GET.
    async fn get(state: AppState, path: &str) -> (StatusCode, String) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, create_router(state)).await;
        });

        let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.text().await.unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(state_for(sample_path()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_index_renders_map() {
        let (status, body) = get(state_for(sample_path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Sand Point"));
        assert!(body.contains(r#"<div id="map"></div>"#));
    }

    #[tokio::test]
    async fn test_map_json() {
        let (status, body) = get(state_for(sample_path()), "/map.json").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["overlay"]["markers"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_missing_feed_is_bad_gateway() {
        let (status, body) = get(state_for(PathBuf::from("/nonexistent.geojson")), "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.starts_with("Failed to load earthquake feed"));
    }
}
