use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wine_rating_engine::{EngineConfig, Resolution, ScoreResolver, WineEngineError};

#[derive(Clone)]
struct AppState {
    resolver: Arc<ScoreResolver>,
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    name: String,
    #[serde(default = "default_true")]
    use_cache: bool,
}

fn default_true() -> bool { true }

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    source: String,
    source_available: bool,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    cache: Option<CacheStatsDto>,
}

#[derive(Debug, Serialize)]
struct CacheStatsDto {
    total_entries: u64,
    total_hits: u64,
    avg_hit_count: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wine_engine_server=debug,wine_rating_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env()?;

    tracing::info!("🚀 Starting Wine Rating Engine Server");
    tracing::info!("🍷 Rating source: {}", config.vivino_base_url);
    tracing::info!("🔌 Port: {}", config.port);

    let resolver = ScoreResolver::from_config(&config).await?;

    let state = AppState {
        resolver: Arc::new(resolver),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/resolve", post(resolve_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: wine_rating_engine::VERSION.to_string(),
        source: state.resolver.source_name().to_string(),
        source_available: state.resolver.source_available().await,
    })
}

async fn resolve_handler(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<Resolution>, AppError> {
    tracing::debug!("Resolve request: {:?}", req);

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    let result = state.resolver.resolve_detailed(&req.name, req.use_cache).await;

    tracing::info!("{}", result.display());

    Ok(Json(result))
}

async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let cache = state.resolver.cache_stats().await?.map(|stats| CacheStatsDto {
        total_entries: stats.total_entries,
        total_hits: stats.total_hits,
        avg_hit_count: stats.avg_hit_count,
    });

    Ok(Json(StatsResponse { cache }))
}

// Error handling
enum AppError {
    BadRequest(String),
    Engine(WineEngineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Engine(WineEngineError::Source { source_name, message }) => (
                StatusCode::BAD_GATEWAY,
                format!("Source '{}' error: {}", source_name, message),
            ),
            AppError::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<WineEngineError>,
{
    fn from(err: E) -> Self {
        AppError::Engine(err.into())
    }
}
