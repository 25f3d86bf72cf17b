use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery};
use crate::api::response::ApiResponse;
use crate::api::upload::UploadForm;
use crate::core::entity::{user, video};
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::video::{NewVideo, SortBy, SortType, VideoSearch, VideoView};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub query: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_type: Option<SortType>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiQuery(params): ApiQuery<ListVideosQuery>,
) -> Result<ApiResponse<Page<VideoView>>, Error> {
    let page = PageQuery::new(params.page, params.limit).map_err(Error::BadRequest)?;
    let search = VideoSearch {
        query: params.query,
        sort_by: params.sort_by.unwrap_or_default(),
        sort_type: params.sort_type.unwrap_or_default(),
        user_id: params.user_id,
    };
    let videos = state.video_svc.list_videos(&user, search, page).await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

pub async fn publish_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<ApiResponse<video::Model>, Error> {
    let mut form = UploadForm::read(&state.media, multipart).await?;
    let new = NewVideo {
        title: form.text("title"),
        description: form.text("description"),
        video_file: form.file("videoFile"),
        thumbnail: form.file("thumbnail"),
    };
    form.discard(&state.media).await;

    let video = state.video_svc.publish_video(&user, new).await?;
    Ok(ApiResponse::created(video, "Video published successfully"))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
) -> Result<ApiResponse<VideoView>, Error> {
    let video = state.video_svc.watch_video(&user, video_id).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

pub async fn update_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateVideoRequest>,
) -> Result<ApiResponse<video::Model>, Error> {
    let video = state
        .video_svc
        .update_video(&user, video_id, req.title, req.description)
        .await?;
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
) -> Result<ApiResponse<()>, Error> {
    state.video_svc.delete_video(&user, video_id).await?;
    Ok(ApiResponse::ok((), "Video deleted successfully"))
}

pub async fn toggle_publish(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(video_id): ApiPath<i64>,
) -> Result<ApiResponse<video::Model>, Error> {
    let video = state.video_svc.toggle_publish(&user, video_id).await?;
    let message = if video.is_published {
        "Video published"
    } else {
        "Video unpublished"
    };
    Ok(ApiResponse::ok(video, message))
}
