//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use juicebox_core::domain::{HydratedPost, Post, PostUpdate};
use juicebox_shared::ApiResponse;
use juicebox_shared::dto::{CreatePostRequest, UpdatePostRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Drop posts the viewer may not see.
pub(super) fn visible_to(posts: Vec<HydratedPost>, viewer: &OptionalIdentity) -> Vec<HydratedPost> {
    let viewer = viewer.user_id();
    posts
        .into_iter()
        .filter(|post| post.is_visible_to(viewer))
        .collect()
}

/// Load a post and check the caller may change it.
async fn owned_post(state: &AppState, id: Uuid, identity: &Identity) -> AppResult<HydratedPost> {
    let post = state.posts.get_post_by_id(id).await?;
    post.ensure_owned_by(identity.id())?;
    Ok(post)
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.get_all_posts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(visible_to(posts, &viewer))))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Post title is required".to_string()));
    }

    let tags = req.tags.map(|tags| tags.into_names()).unwrap_or_default();
    let post = Post::new(identity.id(), req.title, req.content);

    let created = state.posts.create_post(post, tags).await?;
    tracing::info!(post_id = %created.id, author_id = %identity.id(), "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(created)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.get_post_by_id(id).await?;

    // Hidden posts are reported exactly like missing ones.
    if !post.is_visible_to(viewer.user_id()) {
        return Err(AppError::PostNotFound(id));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    owned_post(&state, id, &identity).await?;

    let req = body.into_inner();
    let changes = PostUpdate {
        title: req.title,
        content: req.content,
        active: req.active,
        tags: req.tags.map(|tags| tags.into_names()),
    };

    let updated = state.posts.update_post(id, changes).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated)))
}

/// DELETE /api/posts/{id}
///
/// Deactivates the post; the row and its tag links are kept.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    owned_post(&state, id, &identity).await?;

    let post = state.posts.update_post(id, PostUpdate::deactivate()).await?;
    tracing::info!(post_id = %id, "Post deactivated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post deactivated")))
}
