//! WealthSync Web Server
//!
//! Axum-based REST API for the WealthSync budgeting calculator.
//!
//! Endpoints:
//! - `GET /api/cities` - Known cities for the location picker
//! - `POST /api/budget` - Run a budget calculation and record it
//! - `POST /api/budget/history` - Past calculations for an email
//!
//! Cross-origin access is limited to a configurable allow-list.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use wealthsync_core::{BudgetCalculator, HistoryStore};

mod handlers;

/// Maximum accepted request body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Environment variable holding the comma-separated CORS allow-list
pub const ALLOWED_ORIGINS_ENV: &str = "WEALTHSYNC_ALLOWED_ORIGINS";

/// Origins allowed when no allow-list is configured
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://wealthsync-frontend2.onrender.com",
    "http://localhost:3000",
];

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    /// Build configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        match std::env::var(ALLOWED_ORIGINS_ENV) {
            Ok(value) => Self {
                allowed_origins: parse_origins(&value),
            },
            Err(_) => Self::default(),
        }
    }
}

/// Parse a comma-separated list of origins
///
/// Examples:
/// - "http://localhost:3000" - single origin
/// - "https://app.example.com, http://localhost:3000" - multiple origins
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Shared application state
pub struct AppState {
    pub calculator: BudgetCalculator,
    pub history: Arc<dyn HistoryStore>,
}

/// Create the application router
pub fn create_router(
    calculator: BudgetCalculator,
    history: Arc<dyn HistoryStore>,
    config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState {
        calculator,
        history,
    });

    let api_routes = Router::new()
        .route("/cities", get(handlers::list_cities))
        .route("/budget", post(handlers::calculate_budget))
        .route("/budget/history", post(handlers::budget_history));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    calculator: BudgetCalculator,
    history: Arc<dyn HistoryStore>,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only");
    } else {
        info!(origins = %config.allowed_origins.join(", "), "CORS allow-list");
    }

    let app = create_router(calculator, history, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    /// Request field that failed validation
    field: Option<String>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            field: None,
            internal: None,
        }
    }

    /// Map a core error to its HTTP response
    pub fn from_core(err: wealthsync_core::Error) -> Self {
        match err {
            wealthsync_core::Error::Validation { ref field, .. } => {
                warn!(error = %err, "Rejected budget request");
                Self {
                    status: StatusCode::BAD_REQUEST,
                    message: err.to_string(),
                    field: Some(field.clone()),
                    internal: None,
                }
            }
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                field: None,
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = match self.field {
            Some(field) => Json(serde_json::json!({
                "error": self.message,
                "field": field
            })),
            None => Json(serde_json::json!({
                "error": self.message
            })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            field: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
