use std::sync::Arc;

use axum::Extension;
use axum::extract::State;

use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::response::ApiResponse;
use crate::core::entity::like::LikeTarget;
use crate::core::entity::user;
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::like::LikeToggle;
use crate::service::video::VideoView;

async fn toggle(
    state: &AppState,
    user: &user::Model,
    target: LikeTarget,
) -> Result<ApiResponse<LikeToggle>, Error> {
    let toggled = state.like_svc.toggle_like(user, target).await?;
    let message = if toggled.is_liked { "Liked" } else { "Unliked" };
    Ok(ApiResponse::ok(toggled, message))
}

pub async fn toggle_video_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
) -> Result<ApiResponse<LikeToggle>, Error> {
    toggle(&state, &user, LikeTarget::Video(video_id)).await
}

pub async fn toggle_comment_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(comment_id): ApiPath<i64>,
) -> Result<ApiResponse<LikeToggle>, Error> {
    toggle(&state, &user, LikeTarget::Comment(comment_id)).await
}

pub async fn toggle_tweet_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(tweet_id): ApiPath<i64>,
) -> Result<ApiResponse<LikeToggle>, Error> {
    toggle(&state, &user, LikeTarget::Tweet(tweet_id)).await
}

pub async fn liked_videos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<VideoView>>, Error> {
    let videos = state.like_svc.liked_videos(&user, page).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
