//! HTTP REST API routes

mod statblock_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use statblock_routes::*;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Vocabulary and search
        .route("/api/types", get(statblock_routes::list_types))
        .route("/api/search", post(statblock_routes::search))
        // Stored statblocks; `{*path}` is "<name>", "<name>/tier/<n>" or "<name>/export"
        .route("/api/stat/{*path}", get(statblock_routes::stat_resource))
        .route("/api/save", post(statblock_routes::save_statblock))
        // Stateless transforms
        .route("/api/parse", post(statblock_routes::parse_statblock))
        .route("/api/retier", post(statblock_routes::retier_statblock))
}
