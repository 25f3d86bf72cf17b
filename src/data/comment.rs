use sea_orm::prelude::*;
use sea_orm::{Order, QueryOrder, TransactionTrait};

use crate::core::entity::like::{self, TargetKind};
use crate::core::entity::{comment, user};
use crate::data::page::{Page, PageQuery, fetch_page};

#[derive(Clone)]
pub struct CommentData {
    db: DatabaseConnection,
}

impl CommentData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_comment(
        &self,
        comment: comment::ActiveModel,
    ) -> Result<comment::Model, DbErr> {
        comment.insert(&self.db).await
    }

    pub async fn update_comment(
        &self,
        comment: comment::ActiveModel,
    ) -> Result<comment::Model, DbErr> {
        comment.update(&self.db).await
    }

    pub async fn get_comment(&self, id: i64) -> Result<Option<comment::Model>, DbErr> {
        comment::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn get_owned_comment(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<comment::Model>, DbErr> {
        comment::Entity::find_by_id(id)
            .filter(comment::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
    }

    /// Deletes the comment and the likes pointing at it.
    pub async fn delete_comment(&self, comment: comment::Model) -> Result<(), DbErr> {
        let tx = self.db.begin().await?;
        like::Entity::delete_many()
            .filter(like::Column::TargetKind.eq(TargetKind::Comment))
            .filter(like::Column::TargetId.eq(comment.id))
            .exec(&tx)
            .await?;
        comment.delete(&tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_comments_by_video(
        &self,
        video_id: i64,
        page: PageQuery,
    ) -> Result<Page<(comment::Model, Option<user::Model>)>, DbErr> {
        let select = comment::Entity::find()
            .filter(comment::Column::VideoId.eq(video_id))
            .order_by(comment::Column::CreatedAt, Order::Desc)
            .order_by(comment::Column::Id, Order::Desc)
            .find_also_related(user::Entity);
        fetch_page(&self.db, select, page).await
    }
}
