//! Dish and comment documents, request payloads, and the read-only user record.
//!
//! Stored documents reference comment authors by id (`Dish<Uuid>`). Responses that
//! resolve authors use [`PopulatedDish`] / [`PopulatedComment`], where each author is
//! replaced by the user record (or `null` if the user no longer exists).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment<A = Uuid> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub rating: u8,
    pub comment: String,
    pub author: A,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish<A = Uuid> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub label: String,
    pub price: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "Vec::new")]
    pub comments: Vec<Comment<A>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by every successful write; conditional writes compare against it.
    #[serde(rename = "__v", default)]
    pub version: i64,
}

pub type PopulatedComment = Comment<Option<User>>;
pub type PopulatedDish = Dish<Option<User>>;

impl Dish {
    pub fn new(payload: NewDish) -> Self {
        let now = Utc::now();
        Dish {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            image: payload.image,
            category: payload.category,
            label: payload.label,
            price: payload.price,
            featured: payload.featured,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn comment_position(&self, comment_id: Uuid) -> Option<usize> {
        self.comments.iter().position(|c| c.id == comment_id)
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Overwrites only the fields present in `patch`.
    pub fn apply(&mut self, patch: DishPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
    }

    /// Distinct author ids in comment order.
    pub fn author_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::new();
        for c in &self.comments {
            if !ids.contains(&c.author) {
                ids.push(c.author);
            }
        }
        ids
    }
}

impl Comment {
    pub fn new(payload: NewComment, author: Uuid) -> Self {
        let now = Utc::now();
        Comment {
            id: Uuid::new_v4(),
            rating: payload.rating,
            comment: payload.comment,
            author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Empty text counts as absent, as does a missing rating.
    pub fn apply(&mut self, patch: CommentPatch) {
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(text) = patch.comment.filter(|t| !t.is_empty()) {
            self.comment = text;
        }
        self.updated_at = Utc::now();
    }
}

impl<A> Comment<A> {
    pub fn map_author<B>(self, f: impl FnOnce(A) -> B) -> Comment<B> {
        Comment {
            id: self.id,
            rating: self.rating,
            comment: self.comment,
            author: f(self.author),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<A> Dish<A> {
    pub fn map_authors<B>(self, mut f: impl FnMut(A) -> B) -> Dish<B> {
        Dish {
            id: self.id,
            name: self.name,
            description: self.description,
            image: self.image,
            category: self.category,
            label: self.label,
            price: self.price,
            featured: self.featured,
            comments: self.comments.into_iter().map(|c| c.map_author(&mut f)).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }
}

/// Body of `POST /dishes`. Comments are never accepted on create.
#[derive(Clone, Debug, Deserialize)]
pub struct NewDish {
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub label: String,
    pub price: f64,
    #[serde(default)]
    pub featured: bool,
}

/// Body of `PUT /dishes/:id`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub label: Option<String>,
    pub price: Option<f64>,
    pub featured: Option<bool>,
}

/// Body of `POST /dishes/:id/comments`. Any `author` sent by the client is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct NewComment {
    pub rating: u8,
    pub comment: String,
}

/// Body of `PUT /dishes/:id/comments/:cid`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommentPatch {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

/// Result of a bulk delete.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionSummary {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dish {
        Dish::new(NewDish {
            name: "Uthappizza".into(),
            description: "A unique combination".into(),
            image: "images/uthappizza.png".into(),
            category: "mains".into(),
            label: "Hot".into(),
            price: 4.99,
            featured: true,
        })
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let mut dish = sample();
        dish.apply(DishPatch {
            price: Some(5.5),
            label: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(dish.price, 5.5);
        assert_eq!(dish.label, "");
        assert_eq!(dish.name, "Uthappizza");
        assert!(dish.featured);
    }

    #[test]
    fn empty_comment_text_does_not_overwrite() {
        let author = Uuid::new_v4();
        let mut c = Comment::new(NewComment { rating: 3, comment: "ok".into() }, author);
        c.apply(CommentPatch { rating: Some(4), comment: Some(String::new()) });
        assert_eq!(c.rating, 4);
        assert_eq!(c.comment, "ok");
    }

    #[test]
    fn serializes_with_document_field_names() {
        let dish = sample();
        let v = serde_json::to_value(&dish).unwrap();
        assert_eq!(v["_id"], json!(dish.id.to_string()));
        assert_eq!(v["__v"], json!(0));
        assert!(v.get("createdAt").is_some());
        assert_eq!(v["comments"], json!([]));
    }

    #[test]
    fn new_comment_ignores_client_author() {
        let body = json!({ "rating": 5, "comment": "great", "author": Uuid::new_v4() });
        let payload: NewComment = serde_json::from_value(body).unwrap();
        let caller = Uuid::new_v4();
        let c = Comment::new(payload, caller);
        assert_eq!(c.author, caller);
    }

    #[test]
    fn author_ids_are_distinct_and_ordered() {
        let mut dish = sample();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        for author in [a, b, a] {
            dish.comments.push(Comment::new(NewComment { rating: 1, comment: "x".into() }, author));
        }
        assert_eq!(dish.author_ids(), vec![a, b]);
    }
}
