use sea_orm::prelude::*;
use sea_orm::Set;

use crate::core::entity::like::{self, LikeTarget, TargetKind};

#[derive(Clone)]
pub struct LikeData {
    db: DatabaseConnection,
}

impl LikeData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_like(
        &self,
        user_id: i64,
        target: LikeTarget,
    ) -> Result<Option<like::Model>, DbErr> {
        like::Entity::find()
            .filter(like::Column::LikedBy.eq(user_id))
            .filter(like::Column::TargetKind.eq(target.kind()))
            .filter(like::Column::TargetId.eq(target.id()))
            .one(&self.db)
            .await
    }

    pub async fn create_like(&self, user_id: i64, target: LikeTarget) -> Result<like::Model, DbErr> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let like = like::ActiveModel {
            liked_by: Set(user_id),
            target_kind: Set(target.kind()),
            target_id: Set(target.id()),
            created_at: Set(now),
            ..Default::default()
        };
        like.insert(&self.db).await
    }

    pub async fn delete_like(&self, like: like::Model) -> Result<(), DbErr> {
        like.delete(&self.db).await?;
        Ok(())
    }

    pub async fn count_video_likes(&self, video_ids: Vec<i64>) -> Result<u64, DbErr> {
        if video_ids.is_empty() {
            return Ok(0);
        }
        like::Entity::find()
            .filter(like::Column::TargetKind.eq(TargetKind::Video))
            .filter(like::Column::TargetId.is_in(video_ids))
            .count(&self.db)
            .await
    }
}
