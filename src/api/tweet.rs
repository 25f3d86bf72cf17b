use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::response::ApiResponse;
use crate::core::entity::{tweet, user};
use crate::data::{Page, PageQuery};
use crate::server::AppState;
use crate::service::Error;
use crate::service::tweet::TweetView;

#[derive(Debug, Deserialize)]
pub struct TweetRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn create_tweet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiJson(req): ApiJson<TweetRequest>,
) -> Result<ApiResponse<tweet::Model>, Error> {
    let tweet = state.tweet_svc.create_tweet(&user, &req.content).await?;
    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

pub async fn user_tweets(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<TweetView>>, Error> {
    let tweets = state.tweet_svc.list_user_tweets(user_id, page).await?;
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

pub async fn update_tweet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(tweet_id): ApiPath<i64>,
    ApiJson(req): ApiJson<TweetRequest>,
) -> Result<ApiResponse<tweet::Model>, Error> {
    let tweet = state
        .tweet_svc
        .update_tweet(&user, tweet_id, &req.content)
        .await?;
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

pub async fn delete_tweet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(tweet_id): ApiPath<i64>,
) -> Result<ApiResponse<()>, Error> {
    state.tweet_svc.delete_tweet(&user, tweet_id).await?;
    Ok(ApiResponse::ok((), "Tweet deleted successfully"))
}
