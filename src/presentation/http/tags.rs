use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::dto::DeletedDto;
use crate::application::dto::tags::{TagDto, TagPostsDto};
use crate::application::use_cases::tags::create_tag::CreateTag;
use crate::application::use_cases::tags::delete_tag::DeleteTag;
use crate::application::use_cases::tags::get_tag::GetTag;
use crate::application::use_cases::tags::list_tags::ListTags;
use crate::application::use_cases::tags::update_tag::UpdateTag;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::status_for;

#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagWithPostsResponse {
    pub id: Uuid,
    pub label: String,
    /// Titles of linked posts; `[]` when there are none.
    pub posts: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub label: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTagRequest {
    pub label: String,
}

impl From<TagDto> for TagResponse {
    fn from(d: TagDto) -> Self {
        TagResponse {
            id: d.id,
            label: d.label,
        }
    }
}

impl From<TagPostsDto> for TagWithPostsResponse {
    fn from(d: TagPostsDto) -> Self {
        TagWithPostsResponse {
            id: d.id,
            label: d.label,
            posts: d.posts,
        }
    }
}

impl From<DeletedDto> for DeletedResponse {
    fn from(d: DeletedDto) -> Self {
        DeletedResponse { id: d.id }
    }
}

#[utoipa::path(post, path = "/api/tags", tag = "Tags", request_body = CreateTagRequest,
    responses((status = 200, body = TagResponse)))]
pub async fn create_tag(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateTagRequest>,
) -> Result<Json<TagResponse>, StatusCode> {
    let repo = ctx.tag_repo();
    let uc = CreateTag {
        repo: repo.as_ref(),
    };
    let tag = uc.execute(&req.label).await.map_err(status_for)?;
    Ok(Json(tag.into()))
}

#[utoipa::path(get, path = "/api/tags", tag = "Tags",
    responses((status = 200, body = [TagWithPostsResponse])))]
pub async fn list_tags(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<TagWithPostsResponse>>, StatusCode> {
    let query = ctx.tag_posts();
    let uc = ListTags {
        query: query.as_ref(),
    };
    let items = uc.execute().await.map_err(status_for)?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/tags/{id}", tag = "Tags",
    params(("id" = String, Path, description = "Tag ID")),
    responses((status = 200, body = TagWithPostsResponse), (status = 400), (status = 404)))]
pub async fn get_tag(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<TagWithPostsResponse>, StatusCode> {
    let query = ctx.tag_posts();
    let uc = GetTag {
        query: query.as_ref(),
    };
    let tag = uc.execute(&id).await.map_err(status_for)?;
    Ok(Json(tag.into()))
}

#[utoipa::path(put, path = "/api/tags/{id}", tag = "Tags", request_body = UpdateTagRequest,
    params(("id" = String, Path, description = "Tag ID")),
    responses((status = 200, body = TagResponse), (status = 400), (status = 404)))]
pub async fn update_tag(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<TagResponse>, StatusCode> {
    let repo = ctx.tag_repo();
    let uc = UpdateTag {
        repo: repo.as_ref(),
    };
    let tag = uc.execute(&id, &req.label).await.map_err(status_for)?;
    Ok(Json(tag.into()))
}

#[utoipa::path(delete, path = "/api/tags/{id}", tag = "Tags",
    params(("id" = String, Path, description = "Tag ID")),
    responses((status = 200, body = DeletedResponse), (status = 400), (status = 404)))]
pub async fn delete_tag(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, StatusCode> {
    let repo = ctx.tag_repo();
    let uc = DeleteTag {
        repo: repo.as_ref(),
    };
    let out = uc.execute(&id).await.map_err(status_for)?;
    Ok(Json(out.into()))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/:id", get(get_tag).put(update_tag).delete(delete_tag))
        .with_state(ctx)
}
