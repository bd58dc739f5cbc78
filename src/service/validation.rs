//! Request payload validation.

use crate::error::AppError;
use crate::model::{CommentPatch, DishPatch, NewComment, NewDish};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub struct RequestValidator;

impl RequestValidator {
    pub fn new_dish(dish: &NewDish) -> Result<(), AppError> {
        for (field, value) in [
            ("name", &dish.name),
            ("description", &dish.description),
            ("image", &dish.image),
            ("category", &dish.category),
        ] {
            require_text(field, value)?;
        }
        validate_price(dish.price)
    }

    /// Validate only the fields present in the patch.
    pub fn dish_patch(patch: &DishPatch) -> Result<(), AppError> {
        for (field, value) in [
            ("name", &patch.name),
            ("description", &patch.description),
            ("image", &patch.image),
            ("category", &patch.category),
        ] {
            if let Some(v) = value {
                require_text(field, v)?;
            }
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        Ok(())
    }

    pub fn new_comment(comment: &NewComment) -> Result<(), AppError> {
        validate_rating(comment.rating)?;
        require_text("comment", &comment.comment)
    }

    pub fn comment_patch(patch: &CommentPatch) -> Result<(), AppError> {
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation("price must be at least 0".into()));
    }
    Ok(())
}

fn validate_rating(rating: u8) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}
