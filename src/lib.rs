//! Dish API: REST resource for restaurant dishes and their review comments.

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use auth::JwtService;
pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use model::{Comment, Dish, User};
pub use routes::{app, common_routes, dish_routes};
pub use service::{CommentService, DishService};
pub use state::AppState;
pub use store::{ensure_database_exists, DishStore, MemoryDishStore, PgDishStore};
