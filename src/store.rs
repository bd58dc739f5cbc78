//! Document store abstraction over dish documents and the users they reference.

mod memory;
mod postgres;

pub use memory::MemoryDishStore;
pub use postgres::{ensure_database_exists, PgDishStore};

use crate::error::AppError;
use crate::model::{Dish, User};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait DishStore: Send + Sync {
    /// All dishes in insertion order.
    async fn list_dishes(&self) -> Result<Vec<Dish>, AppError>;

    async fn find_dish(&self, id: Uuid) -> Result<Option<Dish>, AppError>;

    /// Insert a new dish. Fails with `Conflict` if the name is taken.
    async fn insert_dish(&self, dish: &Dish) -> Result<Dish, AppError>;

    /// Replace the stored dish only if its version still equals `expected_version`.
    /// Returns the stored dish with its bumped version, or `None` when the dish
    /// changed or disappeared in the meantime.
    async fn replace_dish(&self, dish: &Dish, expected_version: i64) -> Result<Option<Dish>, AppError>;

    /// Delete one dish, returning the removed document.
    async fn delete_dish(&self, id: Uuid) -> Result<Option<Dish>, AppError>;

    /// Delete every dish, returning how many were removed.
    async fn delete_all_dishes(&self) -> Result<u64, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
