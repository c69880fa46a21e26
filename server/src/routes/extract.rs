use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::extract_handlers::{extract_articles, home};
use crate::handlers::visualize_handlers::visualize_column;

pub fn extract_routes() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/extract", post(extract_articles))
        .route("/visualize", post(visualize_column))
}
