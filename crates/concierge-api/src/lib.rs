//! Concierge API crate - axum HTTP server and chat route handlers.
//!
//! Exposes the assistant to the website widget: session creation, message
//! exchange, history retrieval, and intent inspection.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
