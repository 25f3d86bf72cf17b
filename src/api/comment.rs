use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::response::ApiResponse;
use crate::core::entity::{comment, user};
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::comment::CommentView;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn video_comments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<CommentView>>, Error> {
    let comments = state
        .comment_svc
        .list_video_comments(&user, video_id, page)
        .await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<ApiResponse<comment::Model>, Error> {
    let comment = state
        .comment_svc
        .add_comment(&user, video_id, &req.content)
        .await?;
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(comment_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<ApiResponse<comment::Model>, Error> {
    let comment = state
        .comment_svc
        .update_comment(&user, comment_id, &req.content)
        .await?;
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(comment_id): ApiPath<i64>,
) -> Result<ApiResponse<()>, Error> {
    state.comment_svc.delete_comment(&user, comment_id).await?;
    Ok(ApiResponse::ok((), "Comment deleted successfully"))
}
