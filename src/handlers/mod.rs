//! HTTP handlers for dishes and their comments.

pub mod comment;
pub mod dish;

use uuid::Uuid;

/// Ids that are not uuids cannot name a stored document; callers treat them as absent.
fn parse_id(id_str: &str) -> Option<Uuid> {
    Uuid::parse_str(id_str).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_absent() {
        assert!(parse_id("not-a-uuid").is_none());
        assert!(parse_id(&Uuid::new_v4().to_string()).is_some());
    }
}
