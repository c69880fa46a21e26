pub mod extract;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;
use extract::extract_routes;

pub fn app(state: AppState, config: &Config) -> Router {
    let cors = match &config.client_url {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.clone())
            .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .merge(extract_routes())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
