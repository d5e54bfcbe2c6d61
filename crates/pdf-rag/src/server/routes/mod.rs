//! HTTP routes

pub mod ask;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::StatusResponse;

/// Build all routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ask", post(ask::ask))
        .route("/status", get(status))
}

/// GET /status - current index generation
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.lifecycle().status())
}
