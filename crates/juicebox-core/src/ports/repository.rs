use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{HydratedPost, Post, PostUpdate, PublicUser, Tag, User, UserProfile, UserUpdate};
use crate::error::RepoError;

/// User persistence. Every read except [`UserRepository::find_credentials`]
/// returns public fields only.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Returns `None` when the username is already taken.
    async fn create_user(&self, user: User) -> Result<Option<PublicUser>, RepoError>;

    async fn get_all_users(&self) -> Result<Vec<PublicUser>, RepoError>;

    /// A user with all of their hydrated posts.
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, RepoError>;

    async fn get_user_by_username(&self, username: &str)
    -> Result<Option<PublicUser>, RepoError>;

    /// Single-row lookup used by request authentication.
    async fn find_public_user(&self, id: Uuid) -> Result<Option<PublicUser>, RepoError>;

    /// Full row including the password hash. Login only.
    async fn find_credentials(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Partial update. Returns `None` for an empty update or a missing user.
    async fn update_user(
        &self,
        id: Uuid,
        changes: UserUpdate,
    ) -> Result<Option<PublicUser>, RepoError>;
}

/// Post persistence and hydration.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and its tags atomically, returning the hydrated post.
    async fn create_post(&self, post: Post, tags: Vec<String>) -> Result<HydratedPost, RepoError>;

    /// Idempotently associate tags with a post.
    async fn add_tags_to_post(
        &self,
        post_id: Uuid,
        tags: &[Tag],
    ) -> Result<HydratedPost, RepoError>;

    /// Fails with [`RepoError::PostNotFound`] when the post does not exist.
    async fn get_post_by_id(&self, id: Uuid) -> Result<HydratedPost, RepoError>;

    async fn get_all_posts(&self) -> Result<Vec<HydratedPost>, RepoError>;

    async fn get_posts_by_user(&self, user_id: Uuid) -> Result<Vec<HydratedPost>, RepoError>;

    async fn get_posts_by_tag_name(&self, name: &str) -> Result<Vec<HydratedPost>, RepoError>;

    async fn update_post(&self, id: Uuid, changes: PostUpdate)
    -> Result<HydratedPost, RepoError>;
}

/// Tag persistence.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert unseen names and return one row per distinct name.
    async fn create_tags(&self, names: &[String]) -> Result<Vec<Tag>, RepoError>;

    async fn get_all_tags(&self) -> Result<Vec<Tag>, RepoError>;
}
