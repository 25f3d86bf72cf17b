use sea_orm::prelude::*;
use sea_orm::{Order, QueryOrder, TransactionTrait};

use crate::core::entity::like::{self, TargetKind};
use crate::core::entity::{tweet, user};
use crate::data::page::{Page, PageQuery, fetch_page};

#[derive(Clone)]
pub struct TweetData {
    db: DatabaseConnection,
}

impl TweetData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_tweet(&self, tweet: tweet::ActiveModel) -> Result<tweet::Model, DbErr> {
        tweet.insert(&self.db).await
    }

    pub async fn update_tweet(&self, tweet: tweet::ActiveModel) -> Result<tweet::Model, DbErr> {
        tweet.update(&self.db).await
    }

    pub async fn get_tweet(&self, id: i64) -> Result<Option<tweet::Model>, DbErr> {
        tweet::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn get_owned_tweet(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<tweet::Model>, DbErr> {
        tweet::Entity::find_by_id(id)
            .filter(tweet::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
    }

    /// Deletes the tweet and the likes pointing at it.
    pub async fn delete_tweet(&self, tweet: tweet::Model) -> Result<(), DbErr> {
        let tx = self.db.begin().await?;
        like::Entity::delete_many()
            .filter(like::Column::TargetKind.eq(TargetKind::Tweet))
            .filter(like::Column::TargetId.eq(tweet.id))
            .exec(&tx)
            .await?;
        tweet.delete(&tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_tweets_by_owner(
        &self,
        owner_id: i64,
        page: PageQuery,
    ) -> Result<Page<(tweet::Model, Option<user::Model>)>, DbErr> {
        let select = tweet::Entity::find()
            .filter(tweet::Column::OwnerId.eq(owner_id))
            .order_by(tweet::Column::CreatedAt, Order::Desc)
            .order_by(tweet::Column::Id, Order::Desc)
            .find_also_related(user::Entity);
        fetch_page(&self.db, select, page).await
    }
}
