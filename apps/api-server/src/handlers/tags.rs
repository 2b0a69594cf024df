//! Tag handlers.

use actix_web::{HttpResponse, web};

use juicebox_shared::ApiResponse;

use super::posts::visible_to;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.get_all_tags().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tags)))
}

/// GET /api/tags/{tag_name}/posts
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let tag_name = path.into_inner();
    let posts = state.posts.get_posts_by_tag_name(&tag_name).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(visible_to(posts, &viewer))))
}
