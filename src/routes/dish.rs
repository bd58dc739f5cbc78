//! Dish and comment routes, relative to the dish base path.
//! Every path answers a bare `OPTIONS` with 200; preflights carrying CORS headers are
//! answered by the CORS layer before they reach the router.

use crate::handlers::{comment, dish};
use crate::response::preflight;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn dish_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(dish::list)
                .post(dish::create)
                .put(dish::replace_all)
                .delete(dish::delete_all)
                .options(preflight),
        )
        .route(
            "/:dish_id",
            get(dish::read)
                .post(dish::create_at)
                .put(dish::update)
                .delete(dish::delete)
                .options(preflight),
        )
        .route(
            "/:dish_id/comments",
            get(comment::list)
                .post(comment::create)
                .put(comment::replace_all)
                .delete(comment::delete_all)
                .options(preflight),
        )
        .route(
            "/:dish_id/comments/:comment_id",
            get(comment::read)
                .post(comment::create_at)
                .put(comment::update)
                .delete(comment::delete)
                .options(preflight),
        )
        .with_state(state)
}
