use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{IntoActiveModel, Set};
use serde::Serialize;
use tracing::debug;

use crate::core::entity::{playlist, user};
use crate::data::{Page, PageQuery, PlaylistData, VideoData};
use crate::service::video::{VideoView, video_not_found};
use crate::service::{Error, Result};

/// A playlist together with one page of its videos.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: playlist::Model,
    pub videos: Page<VideoView>,
}

pub struct PlaylistService {
    playlist_data: PlaylistData,
    video_data: VideoData,
}

impl PlaylistService {
    pub fn new(playlist_data: PlaylistData, video_data: VideoData) -> Self {
        Self {
            playlist_data,
            video_data,
        }
    }

    pub async fn create_playlist(
        &self,
        owner: &user::Model,
        name: &str,
        description: &str,
    ) -> Result<playlist::Model> {
        let (name, description) = (name.trim(), description.trim());
        if name.is_empty() || description.is_empty() {
            return Err(Error::BadRequest(
                "Name and description are required".to_string(),
            ));
        }
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let playlist = playlist::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            owner_id: Set(owner.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let playlist = self.playlist_data.create_playlist(playlist).await?;
        debug!("Playlist {} created by user {}", playlist.id, owner.id);
        Ok(playlist)
    }

    pub async fn list_user_playlists(
        &self,
        owner_id: i64,
        page: PageQuery,
    ) -> Result<Page<playlist::Model>> {
        let playlists = self
            .playlist_data
            .list_playlists_by_owner(owner_id, page)
            .await?;
        if playlists.total_docs == 0 {
            return Err(Error::NotFound("No playlist found".to_string()));
        }
        Ok(playlists)
    }

    /// Drafts in the playlist are listed only for their owner.
    pub async fn get_playlist(
        &self,
        viewer: &user::Model,
        id: i64,
        page: PageQuery,
    ) -> Result<PlaylistDetail> {
        let playlist = self
            .playlist_data
            .get_playlist(id)
            .await?
            .ok_or_else(playlist_not_found)?;
        let videos = self
            .video_data
            .list_playlist_videos(playlist.id, viewer.id, page)
            .await?
            .map(VideoView::from);
        Ok(PlaylistDetail { playlist, videos })
    }

    async fn get_owned_playlist(&self, owner: &user::Model, id: i64) -> Result<playlist::Model> {
        self.playlist_data
            .get_owned_playlist(owner.id, id)
            .await?
            .ok_or_else(playlist_not_found)
    }

    pub async fn update_playlist(
        &self,
        owner: &user::Model,
        id: i64,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<playlist::Model> {
        let name = name.map(|n| n.trim().to_string());
        let description = description.map(|d| d.trim().to_string());
        let nothing_to_update = name.is_none() && description.is_none();
        if nothing_to_update || name.as_deref() == Some("") || description.as_deref() == Some("") {
            return Err(Error::BadRequest(
                "Empty fields are not accepted".to_string(),
            ));
        }
        let mut active = self.get_owned_playlist(owner, id).await?.into_active_model();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(self.playlist_data.update_playlist(active).await?)
    }

    pub async fn delete_playlist(&self, owner: &user::Model, id: i64) -> Result<()> {
        let playlist = self.get_owned_playlist(owner, id).await?;
        self.playlist_data.delete_playlist(playlist).await?;
        Ok(())
    }

    /// Adding a video that is already in the playlist succeeds unchanged.
    pub async fn add_video(
        &self,
        owner: &user::Model,
        video_id: i64,
        playlist_id: i64,
    ) -> Result<playlist::Model> {
        let playlist = self.get_owned_playlist(owner, playlist_id).await?;
        self.video_data
            .get_visible_video(video_id, owner.id)
            .await?
            .ok_or_else(video_not_found)?;
        self.playlist_data.add_video(playlist.id, video_id).await?;
        Ok(playlist)
    }

    pub async fn remove_video(
        &self,
        owner: &user::Model,
        video_id: i64,
        playlist_id: i64,
    ) -> Result<playlist::Model> {
        let playlist = self.get_owned_playlist(owner, playlist_id).await?;
        if !self.playlist_data.remove_video(playlist.id, video_id).await? {
            return Err(Error::NotFound(
                "Video not found in playlist".to_string(),
            ));
        }
        Ok(playlist)
    }
}

fn playlist_not_found() -> Error {
    Error::NotFound("Playlist not found".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::testing::{insert_user, insert_video, test_state};

    #[tokio::test]
    async fn playlist_fields_are_validated() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let svc = &state.playlist_svc;

        let err = svc.create_playlist(&alice, "mix", " ").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = svc
            .list_user_playlists(alice.id, PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let playlist = svc.create_playlist(&alice, "mix", "songs").await.unwrap();
        for (name, description) in [
            (None, None),
            (Some(String::new()), None),
            (None, Some("  ".to_string())),
        ] {
            let err = svc
                .update_playlist(&alice, playlist.id, name, description)
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }

        let renamed = svc
            .update_playlist(&alice, playlist.id, Some("road trip".to_string()), None)
            .await
            .unwrap();
        assert_eq!(renamed.name, "road trip");
        assert_eq!(renamed.description, "songs");

        let listed = svc
            .list_user_playlists(alice.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.total_docs, 1);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn only_the_owner_changes_a_playlist() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let video = insert_video(&db, bob.id, "clip", true).await;
        let svc = &state.playlist_svc;
        let playlist = svc.create_playlist(&alice, "mix", "songs").await.unwrap();

        let err = svc
            .update_playlist(&bob, playlist.id, Some("mine".to_string()), None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = svc.add_video(&bob, video.id, playlist.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = svc.delete_playlist(&bob, playlist.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        svc.delete_playlist(&alice, playlist.id).await.unwrap();
        let err = svc
            .get_playlist(&alice, playlist.id, PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn videos_come_and_go() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let video = insert_video(&db, alice.id, "clip", true).await;
        let svc = &state.playlist_svc;
        let playlist = svc.create_playlist(&alice, "mix", "songs").await.unwrap();

        let detail = svc
            .get_playlist(&alice, playlist.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(detail.videos.total_docs, 0);

        let err = svc.add_video(&alice, 999, playlist.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        svc.add_video(&alice, video.id, playlist.id).await.unwrap();
        svc.add_video(&alice, video.id, playlist.id).await.unwrap();

        let detail = svc
            .get_playlist(&alice, playlist.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(detail.videos.total_docs, 1);
        assert_eq!(detail.videos.docs[0].video.id, video.id);

        svc.remove_video(&alice, video.id, playlist.id).await.unwrap();
        let err = svc
            .remove_video(&alice, video.id, playlist.id)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn drafts_stay_out_of_other_peoples_playlists() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let draft = insert_video(&db, alice.id, "draft", false).await;
        let clip = insert_video(&db, alice.id, "clip", true).await;
        let svc = &state.playlist_svc;
        let bobs = svc.create_playlist(&bob, "mix", "songs").await.unwrap();

        let err = svc.add_video(&bob, draft.id, bobs.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        svc.add_video(&bob, clip.id, bobs.id).await.unwrap();
        state.video_svc.toggle_publish(&alice, clip.id).await.unwrap();
        let detail = svc
            .get_playlist(&bob, bobs.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(detail.videos.total_docs, 0);

        let alices = svc.create_playlist(&alice, "wip", "drafts").await.unwrap();
        svc.add_video(&alice, draft.id, alices.id).await.unwrap();
        let own = svc
            .get_playlist(&alice, alices.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(own.videos.total_docs, 1);
        let seen_by_bob = svc
            .get_playlist(&bob, alices.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(seen_by_bob.videos.total_docs, 0);

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
