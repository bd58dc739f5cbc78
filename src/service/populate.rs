//! Resolve comment author ids into user records.

use crate::error::AppError;
use crate::model::{Comment, Dish, PopulatedComment, PopulatedDish, User};
use crate::store::DishStore;
use std::collections::HashMap;
use uuid::Uuid;

async fn load_authors(store: &dyn DishStore, ids: Vec<Uuid>) -> Result<HashMap<Uuid, User>, AppError> {
    let users = store.find_users(&ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

/// One user lookup for all authors across `dishes`.
pub async fn populate_dishes(store: &dyn DishStore, dishes: Vec<Dish>) -> Result<Vec<PopulatedDish>, AppError> {
    let mut ids: Vec<Uuid> = Vec::new();
    for id in dishes.iter().flat_map(|d| d.author_ids()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    let authors = load_authors(store, ids).await?;
    Ok(dishes
        .into_iter()
        .map(|d| d.map_authors(|id| authors.get(&id).cloned()))
        .collect())
}

pub async fn populate_dish(store: &dyn DishStore, dish: Dish) -> Result<PopulatedDish, AppError> {
    let authors = load_authors(store, dish.author_ids()).await?;
    Ok(dish.map_authors(|id| authors.get(&id).cloned()))
}

pub async fn populate_comment(store: &dyn DishStore, comment: Comment) -> Result<PopulatedComment, AppError> {
    let author = store.find_user(comment.author).await?;
    Ok(comment.map_author(|_| author))
}
