use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HydratedPost;
use crate::error::DomainError;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// User entity - the full row, including the password hash.
///
/// Never serialize this to a client; use [`PublicUser`] or [`Author`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

impl User {
    /// Create a new active user with a generated ID.
    pub fn new(username: String, password_hash: String, name: String, location: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            location,
            active: true,
        }
    }

    /// Check registration input before the password is hashed.
    pub fn validate_registration(username: &str, password: &str) -> Result<(), DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::Validation("Username is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            location: user.location,
            active: user.active,
        }
    }
}

/// Author fields attached to a hydrated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub location: String,
}

/// A user together with all of their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub posts: Vec<HydratedPost>,
}

/// Partial update of a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.active.is_none()
    }
}
