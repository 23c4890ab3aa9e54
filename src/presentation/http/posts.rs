use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::dto::posts::PostDto;
use crate::application::use_cases::posts::create_post::CreatePost;
use crate::application::use_cases::posts::delete_post::DeletePost;
use crate::application::use_cases::posts::get_post::GetPost;
use crate::application::use_cases::posts::list_posts::ListPosts;
use crate::application::use_cases::posts::update_post::UpdatePost;
use crate::bootstrap::app_context::AppContext;
use crate::domain::posts::post::PostDraft;
use crate::presentation::http::error::status_for;
use crate::presentation::http::tags::DeletedResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Labels of the linked tags
    pub tags: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Tag IDs to link; replaces the current set on update
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub tags: Option<String>,
}

impl From<PostDto> for PostResponse {
    fn from(d: PostDto) -> Self {
        PostResponse {
            id: d.id,
            title: d.title,
            content: d.content,
            tags: d.tags,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<PostRequest> for PostDraft {
    fn from(r: PostRequest) -> Self {
        PostDraft {
            title: r.title,
            content: r.content,
            tag_ids: r.tags,
        }
    }
}

#[utoipa::path(post, path = "/api/posts", tag = "Posts", request_body = PostRequest,
    responses((status = 200, body = PostResponse), (status = 404, description = "Unknown tag")))]
pub async fn create_post(
    State(ctx): State<AppContext>,
    Json(req): Json<PostRequest>,
) -> Result<Json<PostResponse>, StatusCode> {
    let repo = ctx.post_repo();
    let uc = CreatePost {
        repo: repo.as_ref(),
    };
    let post = uc.execute(req.into()).await.map_err(status_for)?;
    Ok(Json(post.into()))
}

#[utoipa::path(get, path = "/api/posts", tag = "Posts",
    params(("tags" = Option<String>, Query, description = "Comma-separated tag labels")),
    responses((status = 200, body = [PostResponse])))]
pub async fn list_posts(
    State(ctx): State<AppContext>,
    q: Option<Query<ListPostsQuery>>,
) -> Result<Json<Vec<PostResponse>>, StatusCode> {
    let tags = q.and_then(|Query(v)| v.tags);
    let repo = ctx.post_repo();
    let uc = ListPosts {
        repo: repo.as_ref(),
    };
    let items = uc.execute(tags.as_deref()).await.map_err(status_for)?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/posts/{id}", tag = "Posts",
    params(("id" = String, Path, description = "Post ID")),
    responses((status = 200, body = PostResponse), (status = 400), (status = 404)))]
pub async fn get_post(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, StatusCode> {
    let repo = ctx.post_repo();
    let uc = GetPost {
        repo: repo.as_ref(),
    };
    let post = uc.execute(&id).await.map_err(status_for)?;
    Ok(Json(post.into()))
}

#[utoipa::path(put, path = "/api/posts/{id}", tag = "Posts", request_body = PostRequest,
    params(("id" = String, Path, description = "Post ID")),
    responses((status = 200, body = PostResponse), (status = 400), (status = 404)))]
pub async fn update_post(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<PostRequest>,
) -> Result<Json<PostResponse>, StatusCode> {
    let repo = ctx.post_repo();
    let uc = UpdatePost {
        repo: repo.as_ref(),
    };
    let post = uc.execute(&id, req.into()).await.map_err(status_for)?;
    Ok(Json(post.into()))
}

#[utoipa::path(delete, path = "/api/posts/{id}", tag = "Posts",
    params(("id" = String, Path, description = "Post ID")),
    responses((status = 200, body = DeletedResponse), (status = 400), (status = 404)))]
pub async fn delete_post(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, StatusCode> {
    let repo = ctx.post_repo();
    let uc = DeletePost {
        repo: repo.as_ref(),
    };
    let out = uc.execute(&id).await.map_err(status_for)?;
    Ok(Json(out.into()))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .with_state(ctx)
}
