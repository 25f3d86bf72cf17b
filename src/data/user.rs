use std::collections::HashMap;

use sea_orm::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{Condition, IntoActiveModel, Order, QueryOrder, Set};

use crate::core::entity::{user, video, watch_history};

#[derive(Clone)]
pub struct UserData {
    db: DatabaseConnection,
}

impl UserData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, user: user::ActiveModel) -> Result<user::Model, DbErr> {
        user.insert(&self.db).await
    }

    pub async fn update_user(&self, user: user::ActiveModel) -> Result<user::Model, DbErr> {
        user.update(&self.db).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// First user matching either identifier; absent identifiers are ignored.
    pub async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<user::Model>, DbErr> {
        let mut cond = Condition::any();
        if let Some(username) = username {
            cond = cond.add(user::Column::Username.eq(username));
        }
        if let Some(email) = email {
            cond = cond.add(user::Column::Email.eq(email));
        }
        if cond.is_empty() {
            return Ok(None);
        }
        user::Entity::find().filter(cond).one(&self.db).await
    }

    pub async fn email_taken_by_other(&self, email: &str, user_id: i64) -> Result<bool, DbErr> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Id.ne(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn set_refresh_token(
        &self,
        user: user::Model,
        token: Option<String>,
    ) -> Result<user::Model, DbErr> {
        let mut active = user.into_active_model();
        active.refresh_token = Set(token);
        active.update(&self.db).await
    }

    /// Records a view, moving an already watched video to the front.
    pub async fn record_watch(&self, user_id: i64, video_id: i64) -> Result<(), DbErr> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let entry = watch_history::ActiveModel {
            user_id: Set(user_id),
            video_id: Set(video_id),
            watched_at: Set(now),
            ..Default::default()
        };
        watch_history::Entity::insert(entry)
            .on_conflict(
                OnConflict::columns([
                    watch_history::Column::UserId,
                    watch_history::Column::VideoId,
                ])
                .update_column(watch_history::Column::WatchedAt)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Watched videos, most recent first, each paired with its owner.
    pub async fn get_watch_history(
        &self,
        user_id: i64,
    ) -> Result<Vec<(video::Model, Option<user::Model>)>, DbErr> {
        let videos: Vec<video::Model> = watch_history::Entity::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .order_by(watch_history::Column::WatchedAt, Order::Desc)
            .order_by(watch_history::Column::Id, Order::Desc)
            .find_also_related(video::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(_, video)| video)
            .collect();

        let owner_ids: Vec<i64> = videos.iter().map(|v| v.owner_id).collect();
        let owners: HashMap<i64, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(owner_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(videos
            .into_iter()
            .map(|video| {
                let owner = owners.get(&video.owner_id).cloned();
                (video, owner)
            })
            .collect())
    }
}
