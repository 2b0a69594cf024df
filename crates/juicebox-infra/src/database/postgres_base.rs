//! Query building blocks shared by the repositories.
//!
//! Every helper is generic over [`ConnectionTrait`] so the same code runs on
//! the pool and inside a transaction.

use futures::future::try_join_all;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, SqlErr,
};
use uuid::Uuid;

use juicebox_core::domain::{HydratedPost, Tag, normalize_tag_names};
use juicebox_core::error::RepoError;

use super::HydrationConfig;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, AuthorRow, Entity as UserEntity};

/// Map a SeaORM error onto the repository taxonomy.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::Constraint(msg),
        _ => {}
    }

    match err {
        err @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
            RepoError::Connection(err.to_string())
        }
        other => RepoError::Query(other.to_string()),
    }
}

/// Load one post with its tags and author.
pub(crate) async fn fetch_post<C>(conn: &C, post_id: Uuid) -> Result<HydratedPost, RepoError>
where
    C: ConnectionTrait,
{
    let post = PostEntity::find_by_id(post_id)
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(RepoError::PostNotFound(post_id))?;

    let tags_query = TagEntity::find()
        .inner_join(PostTagEntity)
        .filter(post_tag::Column::PostId.eq(post_id))
        .order_by_asc(tag::Column::Name)
        .all(conn);

    let author_query = UserEntity::find_by_id(post.author_id)
        .select_only()
        .columns(user::AUTHOR_COLUMNS)
        .into_model::<AuthorRow>()
        .one(conn);

    let (tags, author) = futures::try_join!(tags_query, author_query).map_err(map_db_err)?;
    let author = author.ok_or_else(|| {
        RepoError::Query(format!(
            "post {post_id} references missing author {}",
            post.author_id
        ))
    })?;

    Ok(HydratedPost {
        id: post.id,
        title: post.title,
        content: post.content,
        active: post.active,
        tags: tags.into_iter().map(Into::into).collect(),
        author: author.into(),
    })
}

/// Hydrate posts in batches of at most `config.max_concurrency`.
///
/// The first failure aborts the whole call; output order follows `ids`.
pub(crate) async fn hydrate_posts<C>(
    conn: &C,
    ids: Vec<Uuid>,
    config: HydrationConfig,
) -> Result<Vec<HydratedPost>, RepoError>
where
    C: ConnectionTrait,
{
    let mut posts = Vec::with_capacity(ids.len());
    for batch in ids.chunks(config.max_concurrency.max(1)) {
        let hydrated = try_join_all(batch.iter().map(|&id| fetch_post(conn, id))).await?;
        posts.extend(hydrated);
    }
    Ok(posts)
}

pub(crate) async fn all_post_ids<C>(conn: &C) -> Result<Vec<Uuid>, RepoError>
where
    C: ConnectionTrait,
{
    PostEntity::find()
        .select_only()
        .column(post::Column::Id)
        .into_tuple::<Uuid>()
        .all(conn)
        .await
        .map_err(map_db_err)
}

pub(crate) async fn post_ids_by_author<C>(conn: &C, author_id: Uuid) -> Result<Vec<Uuid>, RepoError>
where
    C: ConnectionTrait,
{
    PostEntity::find()
        .select_only()
        .column(post::Column::Id)
        .filter(post::Column::AuthorId.eq(author_id))
        .into_tuple::<Uuid>()
        .all(conn)
        .await
        .map_err(map_db_err)
}

pub(crate) async fn post_ids_by_tag_name<C>(conn: &C, name: &str) -> Result<Vec<Uuid>, RepoError>
where
    C: ConnectionTrait,
{
    PostEntity::find()
        .select_only()
        .column(post::Column::Id)
        .inner_join(PostTagEntity)
        .join(JoinType::InnerJoin, post_tag::Relation::Tag.def())
        .filter(tag::Column::Name.eq(name))
        .into_tuple::<Uuid>()
        .all(conn)
        .await
        .map_err(map_db_err)
}

/// Insert unseen tag names, then read back one row per distinct name.
///
/// Rows come back in first-seen input order.
pub(crate) async fn upsert_tags<C>(conn: &C, names: &[String]) -> Result<Vec<Tag>, RepoError>
where
    C: ConnectionTrait,
{
    let names = normalize_tag_names(names);
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let rows = names
        .iter()
        .cloned()
        .map(|name| tag::ActiveModel::from(Tag::new(name)));

    TagEntity::insert_many(rows)
        .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
        .do_nothing()
        .exec_without_returning(conn)
        .await
        .map_err(map_db_err)?;

    let mut tags: Vec<Tag> = TagEntity::find()
        .filter(tag::Column::Name.is_in(names.clone()))
        .all(conn)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(Into::into)
        .collect();

    tags.sort_by_key(|tag| names.iter().position(|name| *name == tag.name));
    Ok(tags)
}

/// Associate tags with a post; pairs that already exist are left alone.
pub(crate) async fn link_tags<C>(conn: &C, post_id: Uuid, tags: &[Tag]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    let mut tag_ids: Vec<Uuid> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !tag_ids.contains(&tag.id) {
            tag_ids.push(tag.id);
        }
    }
    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows = tag_ids.into_iter().map(|tag_id| post_tag::ActiveModel {
        post_id: sea_orm::Set(post_id),
        tag_id: sea_orm::Set(tag_id),
    });

    PostTagEntity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec_without_returning(conn)
        .await
        .map_err(map_db_err)?;

    Ok(())
}

/// Drop every association of `post_id` whose tag is not in `keep`.
pub(crate) async fn unlink_tags_except<C>(
    conn: &C,
    post_id: Uuid,
    keep: &[Tag],
) -> Result<u64, RepoError>
where
    C: ConnectionTrait,
{
    let mut delete = PostTagEntity::delete_many().filter(post_tag::Column::PostId.eq(post_id));
    if !keep.is_empty() {
        let keep_ids: Vec<Uuid> = keep.iter().map(|tag| tag.id).collect();
        delete = delete.filter(post_tag::Column::TagId.is_not_in(keep_ids));
    }

    let result = delete.exec(conn).await.map_err(map_db_err)?;
    Ok(result.rows_affected)
}

pub(crate) async fn ensure_post_exists<C>(conn: &C, post_id: Uuid) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    PostEntity::find_by_id(post_id)
        .one(conn)
        .await
        .map_err(map_db_err)?
        .map(|_| ())
        .ok_or(RepoError::PostNotFound(post_id))
}
