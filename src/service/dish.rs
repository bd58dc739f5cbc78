//! Dish operations and the versioned read-modify-write pipeline.

use crate::error::AppError;
use crate::model::{DeletionSummary, Dish, DishPatch, NewDish, PopulatedDish};
use crate::service::populate::{populate_dish, populate_dishes};
use crate::service::RequestValidator;
use crate::store::DishStore;
use chrono::Utc;
use uuid::Uuid;

/// Conditional writes attempted before giving up with `Conflict`.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

pub struct DishService;

impl DishService {
    /// All dishes with comment authors resolved.
    pub async fn list(store: &dyn DishStore) -> Result<Vec<PopulatedDish>, AppError> {
        let dishes = store.list_dishes().await?;
        populate_dishes(store, dishes).await
    }

    pub async fn create(store: &dyn DishStore, payload: NewDish) -> Result<Dish, AppError> {
        RequestValidator::new_dish(&payload)?;
        let dish = store.insert_dish(&Dish::new(payload)).await?;
        tracing::info!(dish = %dish.id, name = %dish.name, "dish created");
        Ok(dish)
    }

    pub async fn delete_all(store: &dyn DishStore) -> Result<DeletionSummary, AppError> {
        let deleted_count = store.delete_all_dishes().await?;
        tracing::info!(deleted_count, "all dishes deleted");
        Ok(DeletionSummary {
            acknowledged: true,
            deleted_count,
        })
    }

    pub async fn read(store: &dyn DishStore, id: Uuid) -> Result<Option<PopulatedDish>, AppError> {
        match store.find_dish(id).await? {
            Some(dish) => Ok(Some(populate_dish(store, dish).await?)),
            None => Ok(None),
        }
    }

    /// Same as [`DishService::read`] but a missing dish is an error.
    pub async fn read_existing(store: &dyn DishStore, id: Uuid) -> Result<PopulatedDish, AppError> {
        Self::read(store, id)
            .await?
            .ok_or_else(|| AppError::dish_not_found(&id.to_string()))
    }

    pub async fn update(store: &dyn DishStore, id: Uuid, patch: DishPatch) -> Result<Option<Dish>, AppError> {
        RequestValidator::dish_patch(&patch)?;
        mutate_dish(store, id, |dish| {
            dish.apply(patch.clone());
            Ok(())
        })
        .await
    }

    pub async fn delete(store: &dyn DishStore, id: Uuid) -> Result<Option<Dish>, AppError> {
        let removed = store.delete_dish(id).await?;
        if removed.is_some() {
            tracing::info!(dish = %id, "dish deleted");
        }
        Ok(removed)
    }
}

/// Load the dish, apply `change`, and write it back only if nobody wrote in between.
/// Retries on a lost race; `Ok(None)` means the dish does not exist. `change` runs
/// once per attempt against fresh state, so checks inside it see the latest document.
pub async fn mutate_dish<F>(store: &dyn DishStore, id: Uuid, mut change: F) -> Result<Option<Dish>, AppError>
where
    F: FnMut(&mut Dish) -> Result<(), AppError> + Send,
{
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let Some(mut dish) = store.find_dish(id).await? else {
            return Ok(None);
        };
        let expected_version = dish.version;
        change(&mut dish)?;
        dish.updated_at = Utc::now();
        if let Some(saved) = store.replace_dish(&dish, expected_version).await? {
            return Ok(Some(saved));
        }
        tracing::warn!(dish = %id, attempt, "concurrent write on dish, retrying");
    }
    Err(AppError::Conflict(format!(
        "dish {} was modified concurrently, giving up after {} attempts",
        id, MAX_WRITE_ATTEMPTS
    )))
}
