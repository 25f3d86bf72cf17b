use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{IntoActiveModel, Set};
use serde::Serialize;

use crate::core::entity::tweet;
use crate::core::entity::user::{self, Profile};
use crate::data::{Page, PageQuery, TweetData};
use crate::service::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct TweetView {
    #[serde(flatten)]
    pub tweet: tweet::Model,
    pub owner: Option<Profile>,
}

pub struct TweetService {
    tweet_data: TweetData,
}

impl TweetService {
    pub fn new(tweet_data: TweetData) -> Self {
        Self { tweet_data }
    }

    pub async fn create_tweet(&self, owner: &user::Model, content: &str) -> Result<tweet::Model> {
        let content = require_content(content)?;
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let tweet = tweet::ActiveModel {
            owner_id: Set(owner.id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(self.tweet_data.create_tweet(tweet).await?)
    }

    pub async fn list_user_tweets(&self, owner_id: i64, page: PageQuery) -> Result<Page<TweetView>> {
        let tweets = self.tweet_data.list_tweets_by_owner(owner_id, page).await?;
        if tweets.total_docs == 0 {
            return Err(Error::NotFound("No tweet found".to_string()));
        }
        Ok(tweets.map(|(tweet, owner)| TweetView {
            tweet,
            owner: owner.map(Profile::from),
        }))
    }

    pub async fn update_tweet(
        &self,
        owner: &user::Model,
        id: i64,
        content: &str,
    ) -> Result<tweet::Model> {
        let content = require_content(content)?;
        let tweet = self
            .tweet_data
            .get_owned_tweet(owner.id, id)
            .await?
            .ok_or_else(tweet_not_found)?;
        let mut active = tweet.into_active_model();
        active.content = Set(content);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(self.tweet_data.update_tweet(active).await?)
    }

    pub async fn delete_tweet(&self, owner: &user::Model, id: i64) -> Result<()> {
        let tweet = self
            .tweet_data
            .get_owned_tweet(owner.id, id)
            .await?
            .ok_or_else(tweet_not_found)?;
        self.tweet_data.delete_tweet(tweet).await?;
        Ok(())
    }
}

fn require_content(content: &str) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::BadRequest("Tweet content is required".to_string()));
    }
    Ok(content.to_string())
}

fn tweet_not_found() -> Error {
    Error::NotFound("Tweet not found".to_string())
}
