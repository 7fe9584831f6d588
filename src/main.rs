//! Notarial formatter service - formats colindancias blocks for the back office.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use notarial_formatter::config::{ConfigStore, FormatterConfig};
use notarial_formatter::parser::{parse_colindancias, DirectionGroup};
use notarial_formatter::schema::{format_batch, BatchItem, BatchRequest, Notarialization, UnitRequest};
use notarial_formatter::store::{NotarializationStore, DEFAULT_CAPACITY};
use notarial_formatter::{unit_table, Formatter};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    store: NotarializationStore,
    configs: Arc<ConfigStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "notarial_formatter=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "configs".to_string());
    let configs = ConfigStore::load_or_builtin(std::path::Path::new(&config_dir))?;
    info!(
        "Loaded {} configs: {:?} (default: {})",
        configs.list().len(),
        configs.list(),
        configs.default_name()
    );

    let store_capacity = std::env::var("STORE_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CAPACITY);
    info!("Keeping up to {} notarializations in memory", store_capacity);

    let state = AppState {
        store: NotarializationStore::with_capacity(store_capacity),
        configs: Arc::new(configs),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/configs", get(list_configs))
        .route("/configs/:name", get(get_config))
        .route("/parse", post(parse))
        .route("/notarialize", post(notarialize_unit))
        .route("/notarialize/batch", post(notarialize_batch))
        .route("/notarialize/table", post(notarialize_table))
        .route("/notarializations/:id", get(get_notarialization))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List available formatter profiles.
async fn list_configs(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.configs.list())
}

/// Get a specific profile.
async fn get_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FormatterConfig>, AppError> {
    state
        .configs
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("config {}", name)))
}

#[derive(serde::Deserialize)]
struct ConfigQuery {
    config: Option<String>,
}

#[derive(serde::Deserialize)]
struct ParseRequest {
    colindancias: String,
}

/// Parse a colindancias block without formatting it.
async fn parse(Json(req): Json<ParseRequest>) -> Json<Vec<DirectionGroup>> {
    Json(parse_colindancias(&req.colindancias))
}

/// Format one unit.
async fn notarialize_unit(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
    Json(req): Json<UnitRequest>,
) -> Result<Json<Notarialization>, AppError> {
    let (config_name, formatter) = resolve_formatter(&state, &query)?;

    let record = Notarialization::produce(&formatter, &config_name, &req.unit_name, &req.colindancias)
        .map_err(|e| {
            warn!("Unit '{}' rejected by '{}': {}", req.unit_name, config_name, e);
            AppError::UnprocessableEntity(e.to_string())
        })?;

    info!("Formatted '{}' as {} ({} groups)", req.unit_name, record.id, record.groups.len());
    state.store.insert(record.clone());
    Ok(Json(record))
}

/// Format several units; a rejected unit never stops the rest.
async fn notarialize_batch(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Vec<BatchItem>>, AppError> {
    let (config_name, formatter) = resolve_formatter(&state, &query)?;

    let units = req
        .units
        .iter()
        .enumerate()
        .map(|(idx, u)| (idx, u.unit_name.as_str(), u.colindancias.as_str()));
    let items = format_batch(&formatter, &config_name, &state.store, units);

    info!("Batch of {} unit(s) formatted with '{}'", items.len(), config_name);
    Ok(Json(items))
}

/// Upload a CSV/Excel unit table and format every row.
async fn notarialize_table(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
    mut multipart: Multipart,
) -> Result<Json<Vec<BatchItem>>, AppError> {
    let (config_name, formatter) = resolve_formatter(&state, &query)?;

    let mut filename = String::new();
    let mut file_data = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or("units.csv").to_string();
            file_data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?
                .to_vec();
            break;
        }
    }

    if file_data.is_empty() {
        return Err(AppError::Validation("No file uploaded".to_string()));
    }

    info!("Received unit table: {} ({} bytes) with config: {}", filename, file_data.len(), config_name);

    let rows = unit_table::parse_file(&filename, &file_data).map_err(|e| {
        error!("Unit table parsing failed: {:#}", e);
        AppError::UnprocessableEntity(format!("{:#}", e))
    })?;

    let units = rows
        .iter()
        .map(|r| (r.row, r.unit_name.as_str(), r.colindancias.as_str()));
    Ok(Json(format_batch(&formatter, &config_name, &state.store, units)))
}

/// Get a stored notarialization by ID.
async fn get_notarialization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notarialization>, AppError> {
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("notarialization {}", id)))
}

// ============================================================================
// Helper functions
// ============================================================================

fn resolve_formatter(state: &AppState, query: &ConfigQuery) -> Result<(String, Formatter), AppError> {
    let config = state.configs.resolve(query.config.as_deref()).ok_or_else(|| {
        AppError::Validation(format!(
            "Unknown config: {}. Available: {:?}",
            query.config.as_deref().unwrap_or_default(),
            state.configs.list()
        ))
    })?;
    Ok((config.name.clone(), Formatter::from_config(config)))
}
