use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveValue, IntoActiveModel, Order, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::entity::user::{self, Profile};
use crate::core::entity::video;
use crate::data::video::{VideoFilter, VideoSort, VideoWithOwner};
use crate::data::{Page, PageQuery, UserData, VideoData};
use crate::service::media::{MediaService, Upload};
use crate::service::{Error, Result};

/// A video with its owner's public profile alongside.
#[derive(Debug, Clone, Serialize)]
pub struct VideoView {
    #[serde(flatten)]
    pub video: video::Model,
    pub owner: Option<Profile>,
}

impl From<VideoWithOwner> for VideoView {
    fn from((video, owner): VideoWithOwner) -> Self {
        VideoView {
            video,
            owner: owner.map(Profile::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "views")]
    Views,
    #[serde(rename = "title")]
    Title,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default)]
pub struct VideoSearch {
    pub query: Option<String>,
    pub sort_by: SortBy,
    pub sort_type: SortType,
    pub user_id: Option<i64>,
}

pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub video_file: Option<Upload>,
    pub thumbnail: Option<Upload>,
}

pub struct VideoService {
    video_data: VideoData,
    user_data: UserData,
    media: MediaService,
}

impl VideoService {
    pub fn new(video_data: VideoData, user_data: UserData, media: MediaService) -> Self {
        Self {
            video_data,
            user_data,
            media,
        }
    }

    /// Published videos, plus the viewer's own drafts when listing their
    /// own channel.
    pub async fn list_videos(
        &self,
        viewer: &user::Model,
        search: VideoSearch,
        page: PageQuery,
    ) -> Result<Page<VideoView>> {
        let filter = VideoFilter {
            query: search.query,
            owner_id: search.user_id,
            published_only: search.user_id != Some(viewer.id),
            sort: match search.sort_by {
                SortBy::CreatedAt => VideoSort::CreatedAt,
                SortBy::Views => VideoSort::Views,
                SortBy::Title => VideoSort::Title,
            },
            order: match search.sort_type {
                SortType::Asc => Order::Asc,
                SortType::Desc => Order::Desc,
            },
        };
        let videos = self.video_data.list_videos(filter, page).await?;
        Ok(videos.map(VideoView::from))
    }

    pub async fn publish_video(&self, owner: &user::Model, new: NewVideo) -> Result<video::Model> {
        let NewVideo {
            title,
            description,
            video_file,
            thumbnail,
        } = new;
        let title = title.trim().to_string();
        let description = description.trim().to_string();

        let (video_file, thumbnail) = match (video_file, thumbnail) {
            (Some(video_file), Some(thumbnail)) if !title.is_empty() && !description.is_empty() => {
                (video_file, thumbnail)
            }
            (video_file, thumbnail) => {
                let missing_files = video_file.is_none() || thumbnail.is_none();
                self.media
                    .discard_all(video_file.into_iter().chain(thumbnail))
                    .await;
                let msg = if missing_files {
                    "Video file and thumbnail are required"
                } else {
                    "Title and description are required"
                };
                return Err(Error::BadRequest(msg.to_string()));
            }
        };

        let video_url = match self.media.publish(video_file).await {
            Ok(url) => url,
            Err(e) => {
                self.media.discard(thumbnail).await;
                return Err(e.into());
            }
        };
        let thumbnail_url = match self.media.publish(thumbnail).await {
            Ok(url) => url,
            Err(e) => {
                self.media.remove(&video_url).await;
                return Err(e.into());
            }
        };

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let video = video::ActiveModel {
            id: ActiveValue::NotSet,
            owner_id: Set(owner.id),
            video_file: Set(video_url),
            thumbnail: Set(thumbnail_url),
            title: Set(title),
            description: Set(description),
            views: Set(0),
            is_published: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let video = self.video_data.create_video(video).await?;
        debug!("Video {} published by user {}", video.id, owner.id);
        Ok(video)
    }

    /// Fetches a video for watching: counts the view and records it in the
    /// viewer's history.
    pub async fn watch_video(&self, viewer: &user::Model, id: i64) -> Result<VideoView> {
        let (mut video, owner) = self
            .video_data
            .get_video_with_owner(id)
            .await?
            .filter(|(video, _)| video.is_published || video.owner_id == viewer.id)
            .ok_or_else(video_not_found)?;

        self.video_data.increment_views(video.id).await?;
        self.user_data.record_watch(viewer.id, video.id).await?;
        video.views += 1;
        trace!("User {} watched video {}", viewer.id, video.id);

        Ok(VideoView::from((video, owner)))
    }

    pub async fn get_video(&self, id: i64) -> Result<video::Model> {
        self.video_data
            .get_video(id)
            .await?
            .ok_or_else(video_not_found)
    }

    async fn get_owned_video(&self, owner: &user::Model, id: i64) -> Result<video::Model> {
        let video = self.get_video(id).await?;
        if video.owner_id != owner.id {
            return Err(video_not_found());
        }
        Ok(video)
    }

    pub async fn update_video(
        &self,
        owner: &user::Model,
        id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<video::Model> {
        let title = title.map(|t| t.trim().to_string());
        let description = description.map(|d| d.trim().to_string());
        if title.as_deref() == Some("") || description.as_deref() == Some("") {
            return Err(Error::BadRequest(
                "Title and description cannot be empty".to_string(),
            ));
        }
        let video = self.get_owned_video(owner, id).await?;
        let mut active = video.into_active_model();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(self.video_data.update_video(active).await?)
    }

    pub async fn toggle_publish(&self, owner: &user::Model, id: i64) -> Result<video::Model> {
        let video = self.get_owned_video(owner, id).await?;
        let published = !video.is_published;
        let mut active = video.into_active_model();
        active.is_published = Set(published);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(self.video_data.update_video(active).await?)
    }

    pub async fn delete_video(&self, owner: &user::Model, id: i64) -> Result<()> {
        let video = self.get_owned_video(owner, id).await?;
        let files = [video.video_file.clone(), video.thumbnail.clone()];
        self.video_data.delete_video_with_dependents(video).await?;
        for url in &files {
            self.media.remove(url).await;
        }
        debug!("Video {} deleted by user {}", id, owner.id);
        Ok(())
    }
}

pub(crate) fn video_not_found() -> Error {
    Error::NotFound("Video not found".to_string())
}
