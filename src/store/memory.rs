//! In-process store with the same versioning and name-uniqueness rules as PostgreSQL.

use super::DishStore;
use crate::error::AppError;
use crate::model::{Dish, User};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryDishStore {
    dishes: RwLock<Vec<Dish>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryDishStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        MemoryDishStore {
            dishes: RwLock::new(Vec::new()),
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub async fn remove_user(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }
}

fn name_taken(dishes: &[Dish], name: &str, except: Uuid) -> bool {
    dishes.iter().any(|d| d.id != except && d.name == name)
}

#[async_trait]
impl DishStore for MemoryDishStore {
    async fn list_dishes(&self) -> Result<Vec<Dish>, AppError> {
        Ok(self.dishes.read().await.clone())
    }

    async fn find_dish(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        Ok(self.dishes.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn insert_dish(&self, dish: &Dish) -> Result<Dish, AppError> {
        let mut dishes = self.dishes.write().await;
        if name_taken(&dishes, &dish.name, dish.id) {
            return Err(AppError::Conflict(format!("a dish named '{}' already exists", dish.name)));
        }
        if dishes.iter().any(|d| d.id == dish.id) {
            return Err(AppError::Conflict(format!("dish {} already exists", dish.id)));
        }
        dishes.push(dish.clone());
        Ok(dish.clone())
    }

    async fn replace_dish(&self, dish: &Dish, expected_version: i64) -> Result<Option<Dish>, AppError> {
        let mut dishes = self.dishes.write().await;
        if name_taken(&dishes, &dish.name, dish.id) {
            return Err(AppError::Conflict(format!("a dish named '{}' already exists", dish.name)));
        }
        let Some(slot) = dishes.iter_mut().find(|d| d.id == dish.id) else {
            return Ok(None);
        };
        if slot.version != expected_version {
            return Ok(None);
        }
        let mut next = dish.clone();
        next.version = expected_version + 1;
        *slot = next.clone();
        Ok(Some(next))
    }

    async fn delete_dish(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        let mut dishes = self.dishes.write().await;
        let position = dishes.iter().position(|d| d.id == id);
        Ok(position.map(|i| dishes.remove(i)))
    }

    async fn delete_all_dishes(&self) -> Result<u64, AppError> {
        let mut dishes = self.dishes.write().await;
        let n = dishes.len() as u64;
        dishes.clear();
        Ok(n)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
