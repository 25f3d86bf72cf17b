use serde::Serialize;
use tracing::trace;

use crate::core::entity::subscription;
use crate::core::entity::user::{self, Profile};
use crate::data::{Page, PageQuery, SubscriptionData, UserData};
use crate::service::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionToggle {
    pub is_subscribed: bool,
    pub subscription: subscription::Model,
}

pub struct SubscriptionService {
    subscription_data: SubscriptionData,
    user_data: UserData,
}

impl SubscriptionService {
    pub fn new(subscription_data: SubscriptionData, user_data: UserData) -> Self {
        Self {
            subscription_data,
            user_data,
        }
    }

    pub async fn toggle_subscription(
        &self,
        subscriber: &user::Model,
        channel_id: i64,
    ) -> Result<SubscriptionToggle> {
        if subscriber.id == channel_id {
            return Err(Error::BadRequest(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }
        self.user_data
            .get_user_by_id(channel_id)
            .await?
            .ok_or_else(channel_not_found)?;

        let existing = self
            .subscription_data
            .find_subscription(subscriber.id, channel_id)
            .await?;
        if let Some(subscription) = existing {
            trace!("User {} unsubscribed from {}", subscriber.id, channel_id);
            self.subscription_data
                .delete_subscription(subscription.clone())
                .await?;
            return Ok(SubscriptionToggle {
                is_subscribed: false,
                subscription,
            });
        }

        let subscription = self
            .subscription_data
            .create_subscription(subscriber.id, channel_id)
            .await?;
        trace!("User {} subscribed to {}", subscriber.id, channel_id);
        Ok(SubscriptionToggle {
            is_subscribed: true,
            subscription,
        })
    }

    pub async fn list_subscribers(
        &self,
        channel_id: i64,
        page: PageQuery,
    ) -> Result<Page<Profile>> {
        self.user_data
            .get_user_by_id(channel_id)
            .await?
            .ok_or_else(channel_not_found)?;
        let subscribers = self
            .subscription_data
            .list_subscribers(channel_id, page)
            .await?;
        if subscribers.total_docs == 0 {
            return Err(Error::NotFound("No subscriber found".to_string()));
        }
        Ok(profiles(subscribers))
    }

    pub async fn list_subscribed_channels(
        &self,
        subscriber_id: i64,
        page: PageQuery,
    ) -> Result<Page<Profile>> {
        let channels = self
            .subscription_data
            .list_subscribed_channels(subscriber_id, page)
            .await?;
        if channels.total_docs == 0 {
            return Err(Error::NotFound("No channel subscribed".to_string()));
        }
        Ok(profiles(channels))
    }
}

fn profiles(page: Page<(subscription::Model, Option<user::Model>)>) -> Page<Profile> {
    page.filter_map(|(_, user)| user.map(Profile::from))
}

fn channel_not_found() -> Error {
    Error::NotFound("Channel not found".to_string())
}
