//! Handlers for `/:dish_id/comments` and `/:dish_id/comments/:comment_id`.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::{AdminUser, AuthUser, JsonBody};
use crate::model::{CommentPatch, Dish, NewComment, PopulatedComment, PopulatedDish};
use crate::response::unsupported;
use crate::service::CommentService;
use crate::state::AppState;
use crate::store::DishStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

fn dish_id_or_not_found(dish_id: &str) -> Result<Uuid, AppError> {
    parse_id(dish_id).ok_or_else(|| AppError::dish_not_found(dish_id))
}

/// A malformed comment id is reported only once the dish is known to exist.
async fn ids_or_not_found(store: &dyn DishStore, dish_id: &str, comment_id: &str) -> Result<(Uuid, Uuid), AppError> {
    let dish = dish_id_or_not_found(dish_id)?;
    match parse_id(comment_id) {
        Some(comment) => Ok((dish, comment)),
        None if store.find_dish(dish).await?.is_none() => Err(AppError::dish_not_found(dish_id)),
        None => Err(AppError::comment_not_found(comment_id)),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
) -> Result<Json<Vec<PopulatedComment>>, AppError> {
    let id = dish_id_or_not_found(&dish_id)?;
    let comments = CommentService::list(state.store.as_ref(), id).await?;
    Ok(Json(comments))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(dish_id): Path<String>,
    JsonBody(payload): JsonBody<NewComment>,
) -> Result<Json<PopulatedDish>, AppError> {
    let id = dish_id_or_not_found(&dish_id)?;
    let dish = CommentService::add(state.store.as_ref(), id, user.id, payload).await?;
    Ok(Json(dish))
}

pub async fn replace_all(_user: AuthUser, Path(dish_id): Path<String>) -> (StatusCode, String) {
    unsupported(format!("PUT operation is not supported on dishes/{}/comments", dish_id))
}

pub async fn delete_all(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(dish_id): Path<String>,
) -> Result<Json<Dish>, AppError> {
    let id = dish_id_or_not_found(&dish_id)?;
    let dish = CommentService::clear(state.store.as_ref(), id).await?;
    Ok(Json(dish))
}

pub async fn read(
    State(state): State<AppState>,
    Path((dish_id, comment_id)): Path<(String, String)>,
) -> Result<Json<PopulatedComment>, AppError> {
    let (dish, comment) = ids_or_not_found(state.store.as_ref(), &dish_id, &comment_id).await?;
    let comment = CommentService::read(state.store.as_ref(), dish, comment).await?;
    Ok(Json(comment))
}

pub async fn create_at(
    _user: AuthUser,
    Path((dish_id, comment_id)): Path<(String, String)>,
) -> (StatusCode, String) {
    unsupported(format!(
        "POST operation is not supported on dishes/{}/comments/{}",
        dish_id, comment_id
    ))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((dish_id, comment_id)): Path<(String, String)>,
    JsonBody(patch): JsonBody<CommentPatch>,
) -> Result<Json<PopulatedDish>, AppError> {
    let (dish, comment) = ids_or_not_found(state.store.as_ref(), &dish_id, &comment_id).await?;
    let dish = CommentService::update(state.store.as_ref(), dish, comment, user.id, patch).await?;
    Ok(Json(dish))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((dish_id, comment_id)): Path<(String, String)>,
) -> Result<Json<PopulatedDish>, AppError> {
    let (dish, comment) = ids_or_not_found(state.store.as_ref(), &dish_id, &comment_id).await?;
    let dish = CommentService::delete(state.store.as_ref(), dish, comment, user.id).await?;
    Ok(Json(dish))
}
