//! Web form front end

pub mod handlers;
pub mod page;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

/// `GET /` and `POST /` serve the form, `POST /api/ask` answers JSON
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/api/ask", post(handlers::ask))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
