use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::response::ApiResponse;
use crate::core::entity::{playlist, user};
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::playlist::PlaylistDetail;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiJson(req): ApiJson<CreatePlaylistRequest>,
) -> Result<ApiResponse<playlist::Model>, Error> {
    let playlist = state
        .playlist_svc
        .create_playlist(&user, &req.name, &req.description)
        .await?;
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

pub async fn user_playlists(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<playlist::Model>>, Error> {
    let playlists = state
        .playlist_svc
        .list_user_playlists(user_id, page)
        .await?;
    Ok(ApiResponse::ok(playlists, "Playlists fetched successfully"))
}

pub async fn get_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(playlist_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<PlaylistDetail>, Error> {
    let playlist = state.playlist_svc.get_playlist(&user, playlist_id, page).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

pub async fn update_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(playlist_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdatePlaylistRequest>,
) -> Result<ApiResponse<playlist::Model>, Error> {
    let playlist = state
        .playlist_svc
        .update_playlist(&user, playlist_id, req.name, req.description)
        .await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

pub async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(playlist_id): ApiPath<i64>,
) -> Result<ApiResponse<()>, Error> {
    state.playlist_svc.delete_playlist(&user, playlist_id).await?;
    Ok(ApiResponse::ok((), "Playlist deleted successfully"))
}

pub async fn add_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath((video_id, playlist_id)): ApiPath<(i64, i64)>,
) -> Result<ApiResponse<playlist::Model>, Error> {
    let playlist = state
        .playlist_svc
        .add_video(&user, video_id, playlist_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist"))
}

pub async fn remove_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath((video_id, playlist_id)): ApiPath<(i64, i64)>,
) -> Result<ApiResponse<playlist::Model>, Error> {
    let playlist = state
        .playlist_svc
        .remove_video(&user, video_id, playlist_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video removed from playlist"))
}
