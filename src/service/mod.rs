pub mod comment;
pub mod dish;
pub mod ownership;
pub mod populate;
pub mod validation;

pub use comment::CommentService;
pub use dish::{mutate_dish, DishService};
pub use ownership::{authorize_comment_change, is_comment_author};
pub use validation::RequestValidator;
