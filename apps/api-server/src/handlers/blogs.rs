//! Blog feed handlers.

use actix_web::{HttpResponse, web};

use blog_core::domain::{Blog, UserRef};
use blog_shared::dto::{BlogResponse, CreateBlogRequest};

use super::views::blog_response;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn ensure_allowed(state: &AppState, identity: &OptionalIdentity) -> AppResult<()> {
    if state.require_auth && identity.0.is_none() {
        return Err(AppError::Unauthorized(
            "You need to sign in or sign up before continuing.".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/blogs
pub async fn list_blogs(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    ensure_allowed(&state, &identity)?;

    let blogs: Vec<BlogResponse> = state
        .blogs
        .list_newest_first()
        .await?
        .into_iter()
        .map(blog_response)
        .collect();

    Ok(HttpResponse::Ok().json(blogs))
}

/// POST /api/blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    ensure_allowed(&state, &identity)?;

    let params = body.into_inner().blog.ok_or_else(|| {
        AppError::BadRequest("param is missing or the value is empty: blog".to_string())
    })?;

    // The author is always the caller; the body cannot name one.
    let author = identity.0.as_ref().map(|i| UserRef::from(&i.user));
    let blog = Blog::new(params.content.unwrap_or_default(), author)?;

    let saved = state.blogs.create(blog).await?;
    tracing::info!(blog_id = %saved.id, attributed = saved.author.is_some(), "Blog created");

    Ok(HttpResponse::Created().json(blog_response(saved)))
}
