//! Router assembly.

pub mod common;
pub mod dish;

pub use common::common_routes;
pub use dish::dish_routes;

use crate::config::AppConfig;
use crate::cors::cors_layer;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Base path of the dish resource.
pub const DISHES_PATH: &str = "/dishes";

/// Full application: common routes, the dish resource, and the HTTP middleware stack.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest(DISHES_PATH, dish_routes(state))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}
