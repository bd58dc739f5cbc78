//! Dish collection and single-dish handlers.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::{AdminUser, JsonBody};
use crate::model::{DeletionSummary, Dish, DishPatch, NewDish, PopulatedDish};
use crate::response::unsupported;
use crate::service::DishService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PopulatedDish>>, AppError> {
    let dishes = DishService::list(state.store.as_ref()).await?;
    Ok(Json(dishes))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(payload): JsonBody<NewDish>,
) -> Result<Json<Dish>, AppError> {
    let dish = DishService::create(state.store.as_ref(), payload).await?;
    Ok(Json(dish))
}

pub async fn replace_all(_admin: AdminUser) -> (StatusCode, String) {
    unsupported("PUT operation is not supported on dishes".into())
}

pub async fn delete_all(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DeletionSummary>, AppError> {
    let summary = DishService::delete_all(state.store.as_ref()).await?;
    Ok(Json(summary))
}

/// Absent dishes produce a `null` body rather than 404.
pub async fn read(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
) -> Result<Json<Option<PopulatedDish>>, AppError> {
    let Some(id) = parse_id(&dish_id) else {
        return Ok(Json(None));
    };
    let dish = DishService::read(state.store.as_ref(), id).await?;
    Ok(Json(dish))
}

pub async fn create_at(_admin: AdminUser, Path(dish_id): Path<String>) -> (StatusCode, String) {
    unsupported(format!("POST operation is not supported on dishes/{}", dish_id))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(dish_id): Path<String>,
    JsonBody(patch): JsonBody<DishPatch>,
) -> Result<Json<Option<Dish>>, AppError> {
    let Some(id) = parse_id(&dish_id) else {
        return Ok(Json(None));
    };
    let dish = DishService::update(state.store.as_ref(), id, patch).await?;
    Ok(Json(dish))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(dish_id): Path<String>,
) -> Result<Json<Dish>, AppError> {
    let id = parse_id(&dish_id).ok_or_else(|| AppError::dish_not_found(&dish_id))?;
    let removed = DishService::delete(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::dish_not_found(&dish_id))?;
    Ok(Json(removed))
}
