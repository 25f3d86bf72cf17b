use std::sync::Arc;

use axum::Extension;
use axum::extract::State;

use crate::api::extract::ApiQuery;
use crate::api::response::ApiResponse;
use crate::core::entity::{user, video};
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::dashboard::ChannelStats;

pub async fn channel_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
) -> Result<ApiResponse<ChannelStats>, Error> {
    let stats = state.dashboard_svc.channel_stats(&user).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

pub async fn channel_videos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<video::Model>>, Error> {
    let videos = state.dashboard_svc.channel_videos(&user, page).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
