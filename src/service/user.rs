use chrono::Duration;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveValue, IntoActiveModel, Set};
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::AuthConfig;
use crate::core::entity::user;
use crate::core::{jwt, password};
use crate::data::{SubscriptionData, UserData};
use crate::service::media::{MediaService, Upload};
use crate::service::video::VideoView;
use crate::service::{Error, Result};

pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar: Option<Upload>,
    pub cover_image: Option<Upload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub user: user::Model,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub cover_image: String,
    pub subscribers_count: u64,
    pub channels_subscribed_to_count: u64,
    pub is_subscribed: bool,
}

/// Which of the two user images an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    Avatar,
    CoverImage,
}

pub struct UserService {
    user_data: UserData,
    subscription_data: SubscriptionData,
    media: MediaService,
    auth: AuthConfig,
}

impl UserService {
    pub fn new(
        user_data: UserData,
        subscription_data: SubscriptionData,
        media: MediaService,
        auth: AuthConfig,
    ) -> Self {
        Self {
            user_data,
            subscription_data,
            media,
            auth,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<user::Model> {
        let RegisterInput {
            full_name,
            email,
            username,
            password,
            avatar,
            cover_image,
        } = input;
        let username = username.trim().to_lowercase();
        let email = email.trim().to_lowercase();
        let full_name = full_name.trim().to_string();

        let checked = self
            .check_registration(&full_name, &email, &username, &password, avatar.is_some())
            .await;
        let avatar = match (checked, avatar) {
            (Ok(()), Some(avatar)) => avatar,
            (res, avatar) => {
                self.media
                    .discard_all(avatar.into_iter().chain(cover_image))
                    .await;
                return Err(res.err().unwrap_or_else(avatar_required));
            }
        };

        let avatar_url = match self.media.publish(avatar).await {
            Ok(url) => url,
            Err(e) => {
                self.media.discard_all(cover_image).await;
                return Err(e.into());
            }
        };
        let cover_url = match cover_image {
            Some(cover) => match self.media.publish(cover).await {
                Ok(url) => url,
                Err(e) => {
                    self.media.remove(&avatar_url).await;
                    return Err(e.into());
                }
            },
            None => String::new(),
        };

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let new_user = user::ActiveModel {
            id: ActiveValue::NotSet,
            username: Set(username),
            email: Set(email),
            full_name: Set(full_name),
            avatar: Set(avatar_url.clone()),
            cover_image: Set(cover_url.clone()),
            password: Set(password::hash_password(&password)?),
            refresh_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        match self.user_data.create_user(new_user).await {
            Ok(user) => {
                debug!("Registered user {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(e) => {
                self.media.remove(&avatar_url).await;
                self.media.remove(&cover_url).await;
                Err(e.into())
            }
        }
    }

    async fn check_registration(
        &self,
        full_name: &str,
        email: &str,
        username: &str,
        password: &str,
        has_avatar: bool,
    ) -> Result<()> {
        if [full_name, email, username, password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(Error::BadRequest("All fields are required".to_string()));
        }
        if !has_avatar {
            return Err(avatar_required());
        }
        let existing = self
            .user_data
            .find_by_username_or_email(Some(username), Some(email))
            .await?;
        if existing.is_some() {
            return Err(Error::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<LoginResult> {
        let username = username
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty());
        let email = email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        if username.is_none() && email.is_none() {
            return Err(Error::BadRequest(
                "Username or email is required".to_string(),
            ));
        }

        let user = self
            .user_data
            .find_by_username_or_email(username.as_deref(), email.as_deref())
            .await?
            .ok_or_else(|| Error::NotFound("User does not exist".to_string()))?;

        if !password::verify_password(password, &user.password)? {
            return Err(Error::Unauthorized("Invalid user credentials".to_string()));
        }

        let (user, tokens) = self.issue_tokens(user).await?;
        debug!("User {} logged in", user.id);
        Ok(LoginResult { user, tokens })
    }

    pub async fn logout(&self, user: user::Model) -> Result<()> {
        trace!("Logging out user {}", user.id);
        self.user_data.set_refresh_token(user, None).await?;
        Ok(())
    }

    /// Exchanges a refresh token for a new pair. Each refresh token is
    /// single-use: the stored value is rotated on success.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = jwt::verify_token(refresh_token, &self.auth.refresh_token_secret)
            .map_err(|_| Error::Unauthorized("Invalid refresh token".to_string()))?;
        let user = self
            .user_data
            .get_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid refresh token".to_string()))?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            return Err(Error::Unauthorized(
                "Refresh token is expired or used".to_string(),
            ));
        }

        let (_, tokens) = self.issue_tokens(user).await?;
        Ok(tokens)
    }

    async fn issue_tokens(&self, user: user::Model) -> Result<(user::Model, TokenPair)> {
        let access_token = jwt::create_token(
            user.id,
            &user.username,
            Duration::minutes(self.auth.access_token_expiry_minutes),
            &self.auth.access_token_secret,
        )?;
        let refresh_token = jwt::create_token(
            user.id,
            &user.username,
            Duration::days(self.auth.refresh_token_expiry_days),
            &self.auth.refresh_token_secret,
        )?;
        let user = self
            .user_data
            .set_refresh_token(user, Some(refresh_token.clone()))
            .await?;
        Ok((
            user,
            TokenPair {
                access_token,
                refresh_token,
            },
        ))
    }

    pub async fn change_password(
        &self,
        user: user::Model,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if !password::verify_password(old_password, &user.password)? {
            return Err(Error::BadRequest("Invalid old password".to_string()));
        }
        if new_password.trim().is_empty() {
            return Err(Error::BadRequest("New password is required".to_string()));
        }
        let mut active = user.into_active_model();
        active.password = Set(password::hash_password(new_password)?);
        active.updated_at = Set(chrono::Utc::now().into());
        self.user_data.update_user(active).await?;
        Ok(())
    }

    pub async fn update_account(
        &self,
        user: user::Model,
        full_name: &str,
        email: &str,
    ) -> Result<user::Model> {
        let full_name = full_name.trim();
        let email = email.trim().to_lowercase();
        if full_name.is_empty() || email.is_empty() {
            return Err(Error::BadRequest("All fields are required".to_string()));
        }
        if self.user_data.email_taken_by_other(&email, user.id).await? {
            return Err(Error::Conflict("Email is already in use".to_string()));
        }
        let mut active = user.into_active_model();
        active.full_name = Set(full_name.to_string());
        active.email = Set(email);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(self.user_data.update_user(active).await?)
    }

    /// Publishes `upload` as the user's new image and drops the old file.
    pub async fn update_image(
        &self,
        user: user::Model,
        image: ProfileImage,
        upload: Upload,
    ) -> Result<user::Model> {
        let url = self.media.publish(upload).await?;
        let old = match image {
            ProfileImage::Avatar => user.avatar.clone(),
            ProfileImage::CoverImage => user.cover_image.clone(),
        };
        let mut active = user.into_active_model();
        match image {
            ProfileImage::Avatar => active.avatar = Set(url),
            ProfileImage::CoverImage => active.cover_image = Set(url),
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let user = self.user_data.update_user(active).await?;
        if !old.is_empty() {
            self.media.remove(&old).await;
        }
        Ok(user)
    }

    pub async fn channel_profile(
        &self,
        viewer: &user::Model,
        username: &str,
    ) -> Result<ChannelProfile> {
        let username = username.trim().to_lowercase();
        if username.is_empty() {
            return Err(Error::BadRequest("Username is missing".to_string()));
        }
        let channel = self
            .user_data
            .get_user_by_username(&username)
            .await?
            .ok_or_else(|| Error::NotFound("Channel does not exist".to_string()))?;

        let subscribers_count = self.subscription_data.count_subscribers(channel.id).await?;
        let channels_subscribed_to_count = self
            .subscription_data
            .count_subscribed_to(channel.id)
            .await?;
        let is_subscribed = self
            .subscription_data
            .find_subscription(viewer.id, channel.id)
            .await?
            .is_some();

        Ok(ChannelProfile {
            id: channel.id,
            username: channel.username,
            full_name: channel.full_name,
            email: channel.email,
            avatar: channel.avatar,
            cover_image: channel.cover_image,
            subscribers_count,
            channels_subscribed_to_count,
            is_subscribed,
        })
    }

    pub async fn watch_history(&self, user: &user::Model) -> Result<Vec<VideoView>> {
        let history = self.user_data.get_watch_history(user.id).await?;
        Ok(history.into_iter().map(VideoView::from).collect())
    }

    pub async fn get_user_by_token(&self, token: &str) -> Result<user::Model> {
        let claims = jwt::verify_token(token, &self.auth.access_token_secret)?;
        self.user_data
            .get_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid access token".to_string()))
    }
}

fn avatar_required() -> Error {
    Error::BadRequest("Avatar file is required".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::testing::{TEST_PASSWORD, insert_user, insert_video, test_state};

    #[tokio::test]
    async fn register_requires_avatar_and_unique_identity() {
        let (state, db, root) = test_state().await;
        insert_user(&db, "taken").await;

        let input = |username: &str, avatar: Option<Upload>| RegisterInput {
            full_name: "New User".to_string(),
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password: "hunter22".to_string(),
            avatar,
            cover_image: None,
        };

        let err = state
            .user_svc
            .register(input("newbie", None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let mut png: &[u8] = b"png";
        let avatar = state.media.save_to_tmp(&mut png, "png").await.unwrap();
        let err = state
            .user_svc
            .register(input("Taken", Some(avatar.clone())))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(!avatar.path.exists());

        let mut png: &[u8] = b"png";
        let avatar = state.media.save_to_tmp(&mut png, "png").await.unwrap();
        let user = state
            .user_svc
            .register(input("Newbie", Some(avatar)))
            .await
            .unwrap();
        assert_eq!(user.username, "newbie");
        assert!(user.avatar.starts_with("/media/"));
        assert_ne!(user.password, "hunter22");

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("refreshToken").is_none());

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn failed_cover_upload_removes_published_avatar() {
        let (state, db, root) = test_state().await;

        let mut png: &[u8] = b"png";
        let avatar = state.media.save_to_tmp(&mut png, "png").await.unwrap();
        let avatar_name = avatar.name.clone();
        let cover = Upload {
            name: "cover.png".to_string(),
            path: root.join("tmp").join("vanished.png"),
        };

        let err = state
            .user_svc
            .register(RegisterInput {
                full_name: "New User".to_string(),
                email: "newbie@example.com".to_string(),
                username: "newbie".to_string(),
                password: "hunter22".to_string(),
                avatar: Some(avatar.clone()),
                cover_image: Some(cover),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!avatar.path.exists());
        assert!(!root.join("media").join(&avatar_name).exists());

        let users = UserData::new(db);
        assert!(users.get_user_by_username("newbie").await.unwrap().is_none());

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn login_and_refresh_rotation() {
        let (state, db, root) = test_state().await;
        insert_user(&db, "alice").await;
        let svc = &state.user_svc;

        let err = svc.login(None, None, TEST_PASSWORD).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = svc.login(Some("nobody"), None, TEST_PASSWORD).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = svc.login(Some("alice"), None, "wrong").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let login = svc
            .login(None, Some("ALICE@example.com"), TEST_PASSWORD)
            .await
            .unwrap();
        assert_eq!(
            login.user.refresh_token.as_deref(),
            Some(login.tokens.refresh_token.as_str())
        );
        let me = svc
            .get_user_by_token(&login.tokens.access_token)
            .await
            .unwrap();
        assert_eq!(me.username, "alice");

        let rotated = svc.refresh(&login.tokens.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, login.tokens.refresh_token);

        let err = svc.refresh(&login.tokens.refresh_token).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Refresh token is expired or used");

        // An access token is not a refresh token.
        let err = svc.refresh(&rotated.access_token).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn logout_invalidates_refresh_token() {
        let (state, db, root) = test_state().await;
        insert_user(&db, "alice").await;
        let svc = &state.user_svc;

        let login = svc.login(Some("alice"), None, TEST_PASSWORD).await.unwrap();
        svc.logout(login.user).await.unwrap();
        let err = svc.refresh(&login.tokens.refresh_token).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn account_changes() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        insert_user(&db, "bob").await;
        let svc = &state.user_svc;

        let err = svc
            .change_password(alice.clone(), "not it", "new-password")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        svc.change_password(alice.clone(), TEST_PASSWORD, "new-password")
            .await
            .unwrap();
        svc.login(Some("alice"), None, "new-password").await.unwrap();

        let err = svc
            .update_account(alice.clone(), "Alice", "bob@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        let err = svc.update_account(alice.clone(), "", "a@b.c").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let alice = svc
            .get_user_by_token(
                &svc.login(Some("alice"), None, "new-password")
                    .await
                    .unwrap()
                    .tokens
                    .access_token,
            )
            .await
            .unwrap();
        let updated = svc
            .update_account(alice, "Alice Liddell", "Alice@Wonder.land")
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Alice Liddell");
        assert_eq!(updated.email, "alice@wonder.land");

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn channel_profile_and_history() {
        let (state, db, root) = test_state().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let first = insert_video(&db, alice.id, "first", true).await;
        let second = insert_video(&db, alice.id, "second", true).await;
        state
            .subscription_svc
            .toggle_subscription(&bob, alice.id)
            .await
            .unwrap();

        let profile = state.user_svc.channel_profile(&bob, "Alice").await.unwrap();
        assert_eq!(profile.id, alice.id);
        assert_eq!(profile.subscribers_count, 1);
        assert_eq!(profile.channels_subscribed_to_count, 0);
        assert!(profile.is_subscribed);

        let err = state
            .user_svc
            .channel_profile(&bob, "ghost")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        state.video_svc.watch_video(&bob, first.id).await.unwrap();
        state.video_svc.watch_video(&bob, second.id).await.unwrap();
        state.video_svc.watch_video(&bob, first.id).await.unwrap();

        let history = state.user_svc.watch_history(&bob).await.unwrap();
        let ids: Vec<_> = history.iter().map(|v| v.video.id).collect();
        assert_eq!(ids, [first.id, second.id]);
        assert_eq!(history[0].video.views, 2);
        assert_eq!(history[0].owner.as_ref().map(|o| o.id), Some(alice.id));

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
