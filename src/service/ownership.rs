//! Comment ownership checks shared by comment update and delete.

use crate::error::AppError;
use crate::model::Dish;
use uuid::Uuid;

/// True when `comment_id` exists on `dish` and was written by `caller_id`.
pub fn is_comment_author(dish: &Dish, comment_id: Uuid, caller_id: Uuid) -> bool {
    dish.comment(comment_id).is_some_and(|c| c.author == caller_id)
}

/// Position of the comment the caller may change. The comment must exist before
/// authorship is considered.
pub fn authorize_comment_change(
    dish: &Dish,
    comment_id: Uuid,
    caller_id: Uuid,
    action: &'static str,
) -> Result<usize, AppError> {
    let position = dish
        .comment_position(comment_id)
        .ok_or_else(|| AppError::comment_not_found(&comment_id.to_string()))?;
    if !is_comment_author(dish, comment_id, caller_id) {
        tracing::warn!(dish = %dish.id, comment = %comment_id, caller = %caller_id, "comment change by non-author refused");
        return Err(AppError::NotCommentAuthor(action));
    }
    Ok(position)
}
