use std::sync::Arc;

use axum::Extension;
use axum::body::Bytes;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

use crate::api::extract::{ApiJson, ApiMultipart, ApiPath};
use crate::api::response::ApiResponse;
use crate::api::upload::UploadForm;
use crate::core::entity::user;
use crate::server::AppState;
use crate::server::auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::service::Error;
use crate::service::user::{ChannelProfile, LoginResult, ProfileImage, RegisterInput, TokenPair};
use crate::service::video::VideoView;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    cookie
}

fn with_token_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        secure,
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        secure,
    ))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<ApiResponse<user::Model>, Error> {
    let mut form = UploadForm::read(&state.media, multipart).await?;
    let input = RegisterInput {
        full_name: form.text("fullName"),
        email: form.text("email"),
        username: form.text("username"),
        password: form.text("password"),
        avatar: form.file("avatar"),
        cover_image: form.file("coverImage"),
    };
    form.discard(&state.media).await;

    let user = state.user_svc.register(input).await?;
    Ok(ApiResponse::created(user, "User registered successfully"))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginResult>), Error> {
    let result = state
        .user_svc
        .login(req.username.as_deref(), req.email.as_deref(), &req.password)
        .await?;
    let jar = with_token_cookies(jar, &result.tokens, state.config.auth.secure_cookies);
    Ok((jar, ApiResponse::ok(result, "User logged in successfully")))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<()>), Error> {
    state.user_svc.logout(user).await?;
    let jar = jar
        .add(expired_cookie(ACCESS_TOKEN_COOKIE))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE));
    Ok((jar, ApiResponse::ok((), "User logged out successfully")))
}

/// Accepts the refresh token from its cookie or from a JSON body.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<TokenPair>), Error> {
    let from_body = if body.is_empty() {
        RefreshRequest::default()
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| Error::BadRequest(format!("Invalid request body: {e}")))?
    };
    let token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or(from_body.refresh_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Unauthorized("Unauthorized request".to_string()))?;

    let tokens = state.user_svc.refresh(&token).await?;
    let jar = with_token_cookies(jar, &tokens, state.config.auth.secure_cookies);
    Ok((jar, ApiResponse::ok(tokens, "Access token refreshed")))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, Error> {
    state
        .user_svc
        .change_password(user, &req.old_password, &req.new_password)
        .await?;
    Ok(ApiResponse::ok((), "Password changed successfully"))
}

pub async fn current_user(Extension(user): Extension<user::Model>) -> ApiResponse<user::Model> {
    ApiResponse::ok(user, "Current user fetched successfully")
}

pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiJson(req): ApiJson<UpdateAccountRequest>,
) -> Result<ApiResponse<user::Model>, Error> {
    let user = state
        .user_svc
        .update_account(user, &req.full_name, &req.email)
        .await?;
    Ok(ApiResponse::ok(user, "Account details updated successfully"))
}

async fn update_image(
    state: &AppState,
    user: user::Model,
    multipart: axum::extract::Multipart,
    image: ProfileImage,
) -> Result<user::Model, Error> {
    let (field, missing) = match image {
        ProfileImage::Avatar => ("avatar", "Avatar file is missing"),
        ProfileImage::CoverImage => ("coverImage", "Cover image file is missing"),
    };
    let mut form = UploadForm::read(&state.media, multipart).await?;
    let upload = form.file(field);
    form.discard(&state.media).await;
    let upload = upload.ok_or_else(|| Error::BadRequest(missing.to_string()))?;
    state.user_svc.update_image(user, image, upload).await
}

pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<ApiResponse<user::Model>, Error> {
    let user = update_image(&state, user, multipart, ProfileImage::Avatar).await?;
    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

pub async fn update_cover_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<ApiResponse<user::Model>, Error> {
    let user = update_image(&state, user, multipart, ProfileImage::CoverImage).await?;
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}

pub async fn channel_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
    ApiPath(username): ApiPath<String>,
) -> Result<ApiResponse<ChannelProfile>, Error> {
    let profile = state.user_svc.channel_profile(&user, &username).await?;
    Ok(ApiResponse::ok(profile, "User channel fetched successfully"))
}

pub async fn watch_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<user::Model>,
) -> Result<ApiResponse<Vec<VideoView>>, Error> {
    let history = state.user_svc.watch_history(&user).await?;
    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}
