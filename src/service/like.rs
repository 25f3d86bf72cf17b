use serde::Serialize;
use tracing::trace;

use crate::core::entity::like::{self, LikeTarget};
use crate::core::entity::user;
use crate::data::{CommentData, LikeData, Page, PageQuery, TweetData, VideoData};
use crate::service::video::VideoView;
use crate::service::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub is_liked: bool,
    pub like: like::Model,
}

pub struct LikeService {
    like_data: LikeData,
    video_data: VideoData,
    comment_data: CommentData,
    tweet_data: TweetData,
}

impl LikeService {
    pub fn new(
        like_data: LikeData,
        video_data: VideoData,
        comment_data: CommentData,
        tweet_data: TweetData,
    ) -> Self {
        Self {
            like_data,
            video_data,
            comment_data,
            tweet_data,
        }
    }

    /// Likes `target`, or removes the like if the user already left one.
    /// A concurrent duplicate like trips the unique index and surfaces as a
    /// conflict.
    pub async fn toggle_like(&self, user: &user::Model, target: LikeTarget) -> Result<LikeToggle> {
        self.ensure_target_visible(user, target).await?;

        if let Some(existing) = self.like_data.find_like(user.id, target).await? {
            trace!("User {} unliked {:?}", user.id, existing.target());
            self.like_data.delete_like(existing.clone()).await?;
            return Ok(LikeToggle {
                is_liked: false,
                like: existing,
            });
        }

        let like = self.like_data.create_like(user.id, target).await?;
        trace!("User {} liked {:?}", user.id, target);
        Ok(LikeToggle {
            is_liked: true,
            like,
        })
    }

    async fn ensure_target_visible(&self, user: &user::Model, target: LikeTarget) -> Result<()> {
        let (exists, what) = match target {
            LikeTarget::Video(id) => (
                self.video_data.get_visible_video(id, user.id).await?.is_some(),
                "Video",
            ),
            LikeTarget::Comment(id) => (
                self.comment_data.get_comment(id).await?.is_some(),
                "Comment",
            ),
            LikeTarget::Tweet(id) => (self.tweet_data.get_tweet(id).await?.is_some(), "Tweet"),
        };
        if !exists {
            return Err(Error::NotFound(format!("{what} not found")));
        }
        Ok(())
    }

    pub async fn liked_videos(&self, user: &user::Model, page: PageQuery) -> Result<Page<VideoView>> {
        let videos = self.video_data.list_liked_videos(user.id, page).await?;
        if videos.total_docs == 0 {
            return Err(Error::NotFound("No liked videos found".to_string()));
        }
        Ok(videos.map(VideoView::from))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::testing::{insert_user, insert_video, test_state};

    #[tokio::test]
    async fn likes_need_an_existing_target() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;

        for target in [
            LikeTarget::Video(42),
            LikeTarget::Comment(42),
            LikeTarget::Tweet(42),
        ] {
            let err = state.like_svc.toggle_like(&alice, target).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
        }

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn liked_videos_lists_only_video_likes() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let video = insert_video(&db, alice.id, "clip", true).await;
        let tweet = state.tweet_svc.create_tweet(&alice, "hello").await.unwrap();

        let err = state
            .like_svc
            .liked_videos(&bob, PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        state
            .like_svc
            .toggle_like(&bob, LikeTarget::Tweet(tweet.id))
            .await
            .unwrap();
        state
            .like_svc
            .toggle_like(&bob, LikeTarget::Video(video.id))
            .await
            .unwrap();

        let liked = state
            .like_svc
            .liked_videos(&bob, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(liked.total_docs, 1);
        assert_eq!(liked.docs[0].video.id, video.id);
        assert_eq!(liked.docs[0].owner.as_ref().map(|o| o.id), Some(alice.id));

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn drafts_cannot_be_liked_by_others() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let draft = insert_video(&db, alice.id, "draft", false).await;
        let clip = insert_video(&db, alice.id, "clip", true).await;

        let err = state
            .like_svc
            .toggle_like(&bob, LikeTarget::Video(draft.id))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let own = state
            .like_svc
            .toggle_like(&alice, LikeTarget::Video(draft.id))
            .await
            .unwrap();
        assert!(own.is_liked);

        state
            .like_svc
            .toggle_like(&bob, LikeTarget::Video(clip.id))
            .await
            .unwrap();
        state.video_svc.toggle_publish(&alice, clip.id).await.unwrap();
        let err = state
            .like_svc
            .liked_videos(&bob, PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
