use std::sync::Arc;

use axum::Extension;
use axum::extract::State;

use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::response::ApiResponse;
use crate::core::entity::user::{self, Profile};
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::subscription::SubscriptionToggle;

pub async fn toggle_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(channel_id): ApiPath<i64>,
) -> Result<ApiResponse<SubscriptionToggle>, Error> {
    let toggled = state
        .subscription_svc
        .toggle_subscription(&user, channel_id)
        .await?;
    let message = if toggled.is_subscribed {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };
    Ok(ApiResponse::ok(toggled, message))
}

pub async fn channel_subscribers(
    State(state): State<Arc<AppState>>,
    ApiPath(channel_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<Profile>>, Error> {
    let subscribers = state
        .subscription_svc
        .list_subscribers(channel_id, page)
        .await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

pub async fn subscribed_channels(
    State(state): State<Arc<AppState>>,
    ApiPath(subscriber_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<Profile>>, Error> {
    let channels = state
        .subscription_svc
        .list_subscribed_channels(subscriber_id, page)
        .await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully"))
}
