use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Tag};
use crate::error::DomainError;

/// Post entity - the raw `posts` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub active: bool,
}

impl Post {
    /// Create a new active post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            active: true,
        }
    }
}

/// A post joined with its tags and its author's public fields.
///
/// The author foreign key is replaced by `author`; there is no `author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub tags: Vec<Tag>,
    pub author: Author,
}

impl HydratedPost {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author.id == user_id
    }

    /// Active posts are visible to everyone, inactive ones only to their author.
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.active || viewer.is_some_and(|id| self.is_owned_by(id))
    }

    pub fn ensure_owned_by(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::NotOwner {
                post_id: self.id,
                user_id,
            })
        }
    }
}

/// Partial update of a post.
///
/// `tags: Some(..)` replaces the whole tag set, `Some(vec![])` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl PostUpdate {
    pub fn has_column_changes(&self) -> bool {
        self.title.is_some() || self.content.is_some() || self.active.is_some()
    }

    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrated(active: bool, author_id: Uuid) -> HydratedPost {
        HydratedPost {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            content: "C".to_string(),
            active,
            tags: vec![],
            author: Author {
                id: author_id,
                username: "albert".to_string(),
                name: "Al".to_string(),
                location: "Au".to_string(),
            },
        }
    }

    #[test]
    fn test_visibility() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let active = hydrated(true, owner);
        assert!(active.is_visible_to(None));
        assert!(active.is_visible_to(Some(stranger)));

        let inactive = hydrated(false, owner);
        assert!(!inactive.is_visible_to(None));
        assert!(!inactive.is_visible_to(Some(stranger)));
        assert!(inactive.is_visible_to(Some(owner)));
    }

    #[test]
    fn test_ensure_owned_by() {
        let owner = Uuid::new_v4();
        let post = hydrated(true, owner);

        assert!(post.ensure_owned_by(owner).is_ok());
        assert!(matches!(
            post.ensure_owned_by(Uuid::new_v4()),
            Err(DomainError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_serialized_post_has_no_author_id() {
        let json = serde_json::to_value(hydrated(true, Uuid::new_v4())).unwrap();

        assert!(json.get("author_id").is_none());
        assert!(json.get("authorId").is_none());
        assert_eq!(json["author"]["username"], "albert");
    }

    #[test]
    fn test_post_update_column_changes() {
        let tags_only = PostUpdate {
            tags: Some(vec!["#happy".to_string()]),
            ..Default::default()
        };
        assert!(!tags_only.has_column_changes());
        assert!(PostUpdate::deactivate().has_column_changes());
    }
}
