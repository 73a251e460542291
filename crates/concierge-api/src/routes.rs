//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, a body
//! size limit, and the chat endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use concierge_core::config::ConciergeConfig;
use concierge_core::error::ConciergeError;

use crate::handlers;
use crate::state::AppState;

/// Request bodies larger than this are rejected before reaching a handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Allow the site on the configured port plus port+1 for the dev server.
    let port = state.config.general.port;
    let dev_port = port.saturating_add(1);
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", port),
        format!("http://localhost:{}", port),
        format!("http://127.0.0.1:{}", dev_port),
        format!("http://localhost:{}", dev_port),
    ]
    .iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let chat_routes = Router::new()
        .route("/chat/sessions", post(handlers::create_session))
        .route("/chat/message", post(handlers::chat_message))
        .route("/chat/intent", post(handlers::detect_intent))
        .route(
            "/chat/sessions/{id}/history",
            get(handlers::chat_history),
        )
        .route(
            "/chat/sessions/{id}/messages",
            post(handlers::save_message),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(chat_routes)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
///
/// Binds to 127.0.0.1 (localhost only) on the port from config.
pub async fn start_server(config: &ConciergeConfig, state: AppState) -> Result<(), ConciergeError> {
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    tracing::info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConciergeError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| ConciergeError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
