//! Operations on the comments embedded in a dish.

use crate::error::AppError;
use crate::model::{Comment, CommentPatch, Dish, NewComment, PopulatedComment, PopulatedDish};
use crate::service::dish::{mutate_dish, DishService};
use crate::service::ownership::authorize_comment_change;
use crate::service::populate::{populate_comment, populate_dish};
use crate::service::RequestValidator;
use crate::store::DishStore;
use uuid::Uuid;

pub struct CommentService;

impl CommentService {
    pub async fn list(store: &dyn DishStore, dish_id: Uuid) -> Result<Vec<PopulatedComment>, AppError> {
        let dish = DishService::read_existing(store, dish_id).await?;
        Ok(dish.comments)
    }

    pub async fn read(store: &dyn DishStore, dish_id: Uuid, comment_id: Uuid) -> Result<PopulatedComment, AppError> {
        let dish = store
            .find_dish(dish_id)
            .await?
            .ok_or_else(|| AppError::dish_not_found(&dish_id.to_string()))?;
        let comment = dish
            .comment(comment_id)
            .cloned()
            .ok_or_else(|| AppError::comment_not_found(&comment_id.to_string()))?;
        populate_comment(store, comment).await
    }

    /// Append a comment written by `author`, then return the dish with authors resolved.
    pub async fn add(
        store: &dyn DishStore,
        dish_id: Uuid,
        author: Uuid,
        payload: NewComment,
    ) -> Result<PopulatedDish, AppError> {
        RequestValidator::new_comment(&payload)?;
        let comment = Comment::new(payload, author);
        let comment_id = comment.id;
        let saved = mutate_dish(store, dish_id, |dish| {
            dish.comments.push(comment.clone());
            Ok(())
        })
        .await?
        .ok_or_else(|| AppError::dish_not_found(&dish_id.to_string()))?;
        tracing::info!(dish = %dish_id, comment = %comment_id, author = %author, "comment added");
        Self::refetch(store, saved.id).await
    }

    /// Remove every comment of the dish.
    pub async fn clear(store: &dyn DishStore, dish_id: Uuid) -> Result<Dish, AppError> {
        let saved = mutate_dish(store, dish_id, |dish| {
            dish.comments.clear();
            Ok(())
        })
        .await?
        .ok_or_else(|| AppError::dish_not_found(&dish_id.to_string()))?;
        tracing::info!(dish = %dish_id, "comments cleared");
        Ok(saved)
    }

    /// Update rating and/or text of a comment the caller wrote.
    pub async fn update(
        store: &dyn DishStore,
        dish_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
        patch: CommentPatch,
    ) -> Result<PopulatedDish, AppError> {
        RequestValidator::comment_patch(&patch)?;
        let saved = mutate_dish(store, dish_id, |dish| {
            let position = authorize_comment_change(dish, comment_id, caller, "change")?;
            dish.comments[position].apply(patch.clone());
            Ok(())
        })
        .await?
        .ok_or_else(|| AppError::dish_not_found(&dish_id.to_string()))?;
        Self::refetch(store, saved.id).await
    }

    /// Delete a comment the caller wrote.
    pub async fn delete(
        store: &dyn DishStore,
        dish_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
    ) -> Result<PopulatedDish, AppError> {
        let saved = mutate_dish(store, dish_id, |dish| {
            let position = authorize_comment_change(dish, comment_id, caller, "delete")?;
            dish.comments.remove(position);
            Ok(())
        })
        .await?
        .ok_or_else(|| AppError::dish_not_found(&dish_id.to_string()))?;
        tracing::info!(dish = %dish_id, comment = %comment_id, "comment deleted");
        Self::refetch(store, saved.id).await
    }

    /// Responses after a comment write reflect the stored document, not the local copy.
    async fn refetch(store: &dyn DishStore, dish_id: Uuid) -> Result<PopulatedDish, AppError> {
        let dish = store
            .find_dish(dish_id)
            .await?
            .ok_or_else(|| AppError::dish_not_found(&dish_id.to_string()))?;
        populate_dish(store, dish).await
    }
}
