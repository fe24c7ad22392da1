//! Blog post handlers.

use actix_web::{HttpResponse, web};

use folio_core::domain::{Post, PostInput};
use folio_shared::dto::ListPostsQuery;
use folio_shared::{MessageResponse, PostListResponse, PostResponse};

use crate::middleware::auth::{AdminIdentity, OptionalAdmin};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn matches_filters(post: &Post, query: &ListPostsQuery) -> bool {
    let category_ok = query
        .category
        .as_deref()
        .is_none_or(|category| post.category.eq_ignore_ascii_case(category.trim()));
    let tag_ok = query
        .tag
        .as_deref()
        .is_none_or(|tag| post.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim())));

    category_ok && tag_ok
}

/// GET /api/posts
///
/// Published posts for everyone; `?all=true` adds drafts for an admin.
pub async fn list_posts(
    state: web::Data<AppState>,
    admin: OptionalAdmin,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let include_drafts = query.all && admin.is_admin();

    let mut posts = if include_drafts {
        state.posts.list_all().await?
    } else {
        state.posts.list_published().await?
    };
    posts.retain(|post| matches_filters(post, &query));

    Ok(HttpResponse::Ok().json(PostListResponse::new(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let draft = body.into_inner().into_draft()?;
    let post = state.posts.create(draft).await?;

    Ok(HttpResponse::Created().json(PostResponse::new(post)))
}

/// GET /api/posts/{id}
///
/// The path segment is tried as an id first, then as a slug.
pub async fn get_post(
    state: web::Data<AppState>,
    admin: OptionalAdmin,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();

    let post = match state.posts.find_by_id(&key).await? {
        Some(post) => Some(post),
        None => state.posts.find_by_slug(&key).await?,
    };

    // Drafts are invisible to anonymous readers.
    let post = post
        .filter(|post| post.is_published() || admin.is_admin())
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Ok().json(PostResponse::new(post)))
}

/// PUT /api/posts/{id}
///
/// Fields missing from the body keep their stored value.
pub async fn update_post(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<String>,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.update(&id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostResponse::new(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state.posts.delete(&id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
