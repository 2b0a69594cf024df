//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    TryInsertResult,
};
use uuid::Uuid;

use juicebox_core::domain::{
    HydratedPost, Post, PostUpdate, PublicUser, Tag, User, UserProfile, UserUpdate,
};
use juicebox_core::error::RepoError;
use juicebox_core::ports::{PostRepository, TagRepository, UserRepository};

use super::HydrationConfig;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity, PublicUserRow};
use super::postgres_base::{
    all_post_ids, ensure_post_exists, fetch_post, hydrate_posts, link_tags, map_db_err,
    post_ids_by_author, post_ids_by_tag_name, unlink_tags_except, upsert_tags,
};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
    hydration: HydrationConfig,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn, hydration: HydrationConfig) -> Self {
        Self { db, hydration }
    }

    async fn public_user_where(&self, filter: SimpleExpr) -> Result<Option<PublicUser>, RepoError> {
        let row = UserEntity::find()
            .select_only()
            .columns(user::PUBLIC_COLUMNS)
            .filter(filter)
            .into_model::<PublicUserRow>()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: User) -> Result<Option<PublicUser>, RepoError> {
        tracing::debug!(username = %user.username, "Creating user");

        let result = UserEntity::insert(user::ActiveModel::from(user.clone()))
            .on_conflict(OnConflict::column(user::Column::Username).do_nothing().to_owned())
            .do_nothing()
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        match result {
            TryInsertResult::Inserted(rows) if rows > 0 => Ok(Some(user.into())),
            _ => {
                tracing::debug!(username = %user.username, "Username already taken");
                Ok(None)
            }
        }
    }

    async fn get_all_users(&self) -> Result<Vec<PublicUser>, RepoError> {
        let rows = UserEntity::find()
            .select_only()
            .columns(user::PUBLIC_COLUMNS)
            .into_model::<PublicUserRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, RepoError> {
        let Some(user) = self.find_public_user(id).await? else {
            return Ok(None);
        };

        let ids = post_ids_by_author(&self.db, id).await?;
        let posts = hydrate_posts(&self.db, ids, self.hydration).await?;

        Ok(Some(UserProfile { user, posts }))
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<PublicUser>, RepoError> {
        self.public_user_where(user::Column::Username.eq(username))
            .await
    }

    async fn find_public_user(&self, id: Uuid) -> Result<Option<PublicUser>, RepoError> {
        self.public_user_where(user::Column::Id.eq(id)).await
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserUpdate,
    ) -> Result<Option<PublicUser>, RepoError> {
        if changes.is_empty() {
            return Ok(None);
        }
        tracing::debug!(user_id = %id, "Updating user");

        let mut update = UserEntity::update_many().filter(user::Column::Id.eq(id));
        if let Some(name) = changes.name {
            update = update.col_expr(user::Column::Name, Expr::value(name));
        }
        if let Some(location) = changes.location {
            update = update.col_expr(user::Column::Location, Expr::value(location));
        }
        if let Some(active) = changes.active {
            update = update.col_expr(user::Column::Active, Expr::value(active));
        }

        let result = update.exec(&self.db).await.map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_public_user(id).await
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
    hydration: HydrationConfig,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn, hydration: HydrationConfig) -> Self {
        Self { db, hydration }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, post: Post, tags: Vec<String>) -> Result<HydratedPost, RepoError> {
        let post_id = post.id;
        tracing::debug!(post_id = %post_id, author_id = %post.author_id, "Creating post");

        // Dropping `txn` on an early return rolls everything back.
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PostEntity::insert(post::ActiveModel::from(post))
            .exec_without_returning(&txn)
            .await
            .map_err(map_db_err)?;

        let tags = upsert_tags(&txn, &tags).await?;
        link_tags(&txn, post_id, &tags).await?;
        let hydrated = fetch_post(&txn, post_id).await?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(hydrated)
    }

    async fn add_tags_to_post(
        &self,
        post_id: Uuid,
        tags: &[Tag],
    ) -> Result<HydratedPost, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        ensure_post_exists(&txn, post_id).await?;
        link_tags(&txn, post_id, tags).await?;
        let hydrated = fetch_post(&txn, post_id).await?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(hydrated)
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<HydratedPost, RepoError> {
        fetch_post(&self.db, id).await
    }

    async fn get_all_posts(&self) -> Result<Vec<HydratedPost>, RepoError> {
        let ids = all_post_ids(&self.db).await?;
        tracing::debug!(count = ids.len(), "Hydrating all posts");
        hydrate_posts(&self.db, ids, self.hydration).await
    }

    async fn get_posts_by_user(&self, user_id: Uuid) -> Result<Vec<HydratedPost>, RepoError> {
        let ids = post_ids_by_author(&self.db, user_id).await?;
        hydrate_posts(&self.db, ids, self.hydration).await
    }

    async fn get_posts_by_tag_name(&self, name: &str) -> Result<Vec<HydratedPost>, RepoError> {
        let ids = post_ids_by_tag_name(&self.db, name).await?;
        tracing::debug!(tag = %name, count = ids.len(), "Hydrating posts by tag");
        hydrate_posts(&self.db, ids, self.hydration).await
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostUpdate,
    ) -> Result<HydratedPost, RepoError> {
        tracing::debug!(post_id = %id, "Updating post");
        let has_column_changes = changes.has_column_changes();

        let txn = self.db.begin().await.map_err(map_db_err)?;
        ensure_post_exists(&txn, id).await?;

        if has_column_changes {
            let mut update = PostEntity::update_many().filter(post::Column::Id.eq(id));
            if let Some(title) = changes.title {
                update = update.col_expr(post::Column::Title, Expr::value(title));
            }
            if let Some(content) = changes.content {
                update = update.col_expr(post::Column::Content, Expr::value(content));
            }
            if let Some(active) = changes.active {
                update = update.col_expr(post::Column::Active, Expr::value(active));
            }
            update.exec(&txn).await.map_err(map_db_err)?;
        }

        if let Some(names) = changes.tags {
            let tags = upsert_tags(&txn, &names).await?;
            let removed = unlink_tags_except(&txn, id, &tags).await?;
            link_tags(&txn, id, &tags).await?;
            tracing::debug!(post_id = %id, tags = tags.len(), removed, "Replaced post tags");
        }

        let hydrated = fetch_post(&txn, id).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(hydrated)
    }
}

/// PostgreSQL tag repository.
pub struct PostgresTagRepository {
    db: DbConn,
}

impl PostgresTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn create_tags(&self, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        upsert_tags(&self.db, names).await
    }

    async fn get_all_tags(&self) -> Result<Vec<Tag>, RepoError> {
        let tags = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(tags.into_iter().map(Into::into).collect())
    }
}
