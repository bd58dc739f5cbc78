//! Shared application state for all routes. Built once at startup, never mutated afterwards.

use crate::auth::JwtService;
use crate::store::DishStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DishStore>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DishStore>, jwt: JwtService) -> Self {
        AppState {
            store,
            jwt: Arc::new(jwt),
        }
    }
}
