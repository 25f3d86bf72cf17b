use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{IntoActiveModel, Set};
use serde::Serialize;

use crate::core::entity::comment;
use crate::core::entity::user::{self, Profile};
use crate::data::{CommentData, Page, PageQuery, VideoData};
use crate::service::video::video_not_found;
use crate::service::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: comment::Model,
    pub owner: Option<Profile>,
}

pub struct CommentService {
    comment_data: CommentData,
    video_data: VideoData,
}

impl CommentService {
    pub fn new(comment_data: CommentData, video_data: VideoData) -> Self {
        Self {
            comment_data,
            video_data,
        }
    }

    pub async fn list_video_comments(
        &self,
        viewer: &user::Model,
        video_id: i64,
        page: PageQuery,
    ) -> Result<Page<CommentView>> {
        self.video_data
            .get_visible_video(video_id, viewer.id)
            .await?
            .ok_or_else(video_not_found)?;
        let comments = self
            .comment_data
            .list_comments_by_video(video_id, page)
            .await?;
        Ok(comments.map(|(comment, owner)| CommentView {
            comment,
            owner: owner.map(Profile::from),
        }))
    }

    pub async fn add_comment(
        &self,
        owner: &user::Model,
        video_id: i64,
        content: &str,
    ) -> Result<comment::Model> {
        self.video_data
            .get_visible_video(video_id, owner.id)
            .await?
            .ok_or_else(video_not_found)?;
        let content = require_content(content)?;
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let comment = comment::ActiveModel {
            video_id: Set(video_id),
            owner_id: Set(owner.id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(self.comment_data.create_comment(comment).await?)
    }

    pub async fn update_comment(
        &self,
        owner: &user::Model,
        id: i64,
        content: &str,
    ) -> Result<comment::Model> {
        let content = require_content(content)?;
        let comment = self
            .comment_data
            .get_owned_comment(owner.id, id)
            .await?
            .ok_or_else(comment_not_found)?;
        let mut active = comment.into_active_model();
        active.content = Set(content);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(self.comment_data.update_comment(active).await?)
    }

    pub async fn delete_comment(&self, owner: &user::Model, id: i64) -> Result<()> {
        let comment = self
            .comment_data
            .get_owned_comment(owner.id, id)
            .await?
            .ok_or_else(comment_not_found)?;
        self.comment_data.delete_comment(comment).await?;
        Ok(())
    }
}

fn require_content(content: &str) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::BadRequest("Comment content is required".to_string()));
    }
    Ok(content.to_string())
}

fn comment_not_found() -> Error {
    Error::NotFound("Comment not found".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::core::entity::like::LikeTarget;
    use crate::data::LikeData;
    use crate::testing::{insert_user, insert_video, test_state};

    #[tokio::test]
    async fn comments_carry_their_author() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let video = insert_video(&db, alice.id, "clip", true).await;
        let svc = &state.comment_svc;

        let err = svc.add_comment(&bob, video.id, "   ").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = svc.add_comment(&bob, 999, "hi").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let first = svc.add_comment(&bob, video.id, " nice ").await.unwrap();
        assert_eq!(first.content, "nice");
        let second = svc.add_comment(&alice, video.id, "thanks").await.unwrap();

        let page = svc
            .list_video_comments(&bob, video.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_docs, 2);
        assert_eq!(page.docs[0].comment.id, second.id);
        assert_eq!(page.docs[0].owner.as_ref().map(|o| o.id), Some(alice.id));
        assert_eq!(
            page.docs[1].owner.as_ref().map(|o| o.username.as_str()),
            Some("bob")
        );

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn only_the_author_edits_or_deletes() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let video = insert_video(&db, alice.id, "clip", true).await;
        let svc = &state.comment_svc;
        let comment = svc.add_comment(&bob, video.id, "first").await.unwrap();

        let err = svc
            .update_comment(&alice, comment.id, "hijacked")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = svc.delete_comment(&alice, comment.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = svc.update_comment(&bob, comment.id, "").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let updated = svc.update_comment(&bob, comment.id, "edited").await.unwrap();
        assert_eq!(updated.content, "edited");

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn deleting_a_comment_drops_its_likes() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let video = insert_video(&db, alice.id, "clip", true).await;
        let comment = state
            .comment_svc
            .add_comment(&bob, video.id, "first")
            .await
            .unwrap();
        let target = LikeTarget::Comment(comment.id);
        state.like_svc.toggle_like(&alice, target).await.unwrap();

        state.comment_svc.delete_comment(&bob, comment.id).await.unwrap();

        let likes = LikeData::new(db);
        assert!(likes.find_like(alice.id, target).await.unwrap().is_none());
        let err = state
            .comment_svc
            .delete_comment(&bob, comment.id)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn drafts_take_comments_from_their_owner_only() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let draft = insert_video(&db, alice.id, "draft", false).await;
        let svc = &state.comment_svc;

        let err = svc.add_comment(&bob, draft.id, "sneak").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = svc
            .list_video_comments(&bob, draft.id, PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        svc.add_comment(&alice, draft.id, "note to self").await.unwrap();
        let page = svc
            .list_video_comments(&alice, draft.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_docs, 1);

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
