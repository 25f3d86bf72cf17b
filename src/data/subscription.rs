use sea_orm::prelude::*;
use sea_orm::{Order, QueryOrder, Set};

use crate::core::entity::subscription::{self, ChannelLink, SubscriberLink};
use crate::core::entity::user;
use crate::data::page::{Page, PageQuery, fetch_page};

#[derive(Clone)]
pub struct SubscriptionData {
    db: DatabaseConnection,
}

impl SubscriptionData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_subscription(
        &self,
        subscriber_id: i64,
        channel_id: i64,
    ) -> Result<Option<subscription::Model>, DbErr> {
        subscription::Entity::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .one(&self.db)
            .await
    }

    pub async fn create_subscription(
        &self,
        subscriber_id: i64,
        channel_id: i64,
    ) -> Result<subscription::Model, DbErr> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let subscription = subscription::ActiveModel {
            subscriber_id: Set(subscriber_id),
            channel_id: Set(channel_id),
            created_at: Set(now),
            ..Default::default()
        };
        subscription.insert(&self.db).await
    }

    pub async fn delete_subscription(&self, subscription: subscription::Model) -> Result<(), DbErr> {
        subscription.delete(&self.db).await?;
        Ok(())
    }

    pub async fn count_subscribers(&self, channel_id: i64) -> Result<u64, DbErr> {
        subscription::Entity::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .count(&self.db)
            .await
    }

    pub async fn count_subscribed_to(&self, subscriber_id: i64) -> Result<u64, DbErr> {
        subscription::Entity::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .count(&self.db)
            .await
    }

    /// Users subscribed to `channel_id`, latest subscription first.
    pub async fn list_subscribers(
        &self,
        channel_id: i64,
        page: PageQuery,
    ) -> Result<Page<(subscription::Model, Option<user::Model>)>, DbErr> {
        let select = subscription::Entity::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .order_by(subscription::Column::CreatedAt, Order::Desc)
            .order_by(subscription::Column::Id, Order::Desc)
            .find_also_linked(SubscriberLink);
        fetch_page(&self.db, select, page).await
    }

    /// Channels `subscriber_id` follows, latest subscription first.
    pub async fn list_subscribed_channels(
        &self,
        subscriber_id: i64,
        page: PageQuery,
    ) -> Result<Page<(subscription::Model, Option<user::Model>)>, DbErr> {
        let select = subscription::Entity::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .order_by(subscription::Column::CreatedAt, Order::Desc)
            .order_by(subscription::Column::Id, Order::Desc)
            .find_also_linked(ChannelLink);
        fetch_page(&self.db, select, page).await
    }
}
