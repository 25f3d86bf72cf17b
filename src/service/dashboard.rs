use serde::Serialize;

use crate::core::entity::{user, video};
use crate::data::{LikeData, Page, PageQuery, SubscriptionData, VideoData};
use crate::service::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: u64,
    pub total_views: i64,
    pub total_subscribers: u64,
    pub total_likes: u64,
}

pub struct DashboardService {
    video_data: VideoData,
    like_data: LikeData,
    subscription_data: SubscriptionData,
}

impl DashboardService {
    pub fn new(
        video_data: VideoData,
        like_data: LikeData,
        subscription_data: SubscriptionData,
    ) -> Self {
        Self {
            video_data,
            like_data,
            subscription_data,
        }
    }

    pub async fn channel_stats(&self, owner: &user::Model) -> Result<ChannelStats> {
        let videos = self.video_data.get_owner_stats(owner.id).await?;
        let total_subscribers = self.subscription_data.count_subscribers(owner.id).await?;
        let total_likes = self.like_data.count_video_likes(videos.video_ids).await?;
        Ok(ChannelStats {
            total_videos: videos.total_videos,
            total_views: videos.total_views,
            total_subscribers,
            total_likes,
        })
    }

    pub async fn channel_videos(
        &self,
        owner: &user::Model,
        page: PageQuery,
    ) -> Result<Page<video::Model>> {
        Ok(self.video_data.list_videos_by_owner(owner.id, page).await?)
    }
}
