use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use migration::*;
use sea_orm::{Database, DatabaseConnection};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::core::storage::{Storage, StorageConfig};
use crate::data::{
    CommentData, LikeData, PlaylistData, SubscriptionData, TweetData, UserData, VideoData,
};
use crate::server::auth;
use crate::service::{
    CommentService, DashboardService, LikeService, MediaService, PlaylistService,
    SubscriptionService, TweetService, UserService, VideoService,
};

pub async fn run(config: Config) -> anyhow::Result<()> {
    let host = config.host.clone();
    let port = config.port;
    let server_url = format!("{host}:{port}");

    tracing::info!("Server starting at {server_url}");

    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    let state = AppState::new(db, config).await?;
    let app = router(state)?;

    let listener = tokio::net::TcpListener::bind(&server_url)
        .await
        .context("Listening failed")?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}

pub fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(state.config.cors_origin.as_deref())?;
    let require_auth = || middleware::from_fn_with_state(state.clone(), auth::auth);

    let user_routes = Router::new()
        .route("/logout", post(api::user::logout))
        .route("/change-password", post(api::user::change_password))
        .route("/current-user", get(api::user::current_user))
        .route("/update-account", patch(api::user::update_account))
        .route("/avatar", patch(api::user::update_avatar))
        .route("/cover-image", patch(api::user::update_cover_image))
        .route("/c/{username}", get(api::user::channel_profile))
        .route("/history", get(api::user::watch_history))
        .route_layer(require_auth())
        .route("/register", post(api::user::register))
        .route("/login", post(api::user::login))
        .route("/refresh-token", post(api::user::refresh_token));

    let video_routes = Router::new()
        .route(
            "/",
            get(api::video::list_videos).post(api::video::publish_video),
        )
        .route(
            "/{video_id}",
            get(api::video::get_video)
                .patch(api::video::update_video)
                .delete(api::video::delete_video),
        )
        .route(
            "/toggle/publish/{video_id}",
            patch(api::video::toggle_publish),
        )
        .route_layer(require_auth());

    let tweet_routes = Router::new()
        .route("/", post(api::tweet::create_tweet))
        .route("/user/{user_id}", get(api::tweet::user_tweets))
        .route(
            "/{tweet_id}",
            patch(api::tweet::update_tweet).delete(api::tweet::delete_tweet),
        )
        .route_layer(require_auth());

    let comment_routes = Router::new()
        .route(
            "/{video_id}",
            get(api::comment::video_comments).post(api::comment::add_comment),
        )
        .route(
            "/c/{comment_id}",
            patch(api::comment::update_comment).delete(api::comment::delete_comment),
        )
        .route_layer(require_auth());

    let like_routes = Router::new()
        .route("/toggle/v/{video_id}", post(api::like::toggle_video_like))
        .route("/toggle/c/{comment_id}", post(api::like::toggle_comment_like))
        .route("/toggle/t/{tweet_id}", post(api::like::toggle_tweet_like))
        .route("/videos", get(api::like::liked_videos))
        .route_layer(require_auth());

    let playlist_routes = Router::new()
        .route("/", post(api::playlist::create_playlist))
        .route("/user/{user_id}", get(api::playlist::user_playlists))
        .route(
            "/{playlist_id}",
            get(api::playlist::get_playlist)
                .patch(api::playlist::update_playlist)
                .delete(api::playlist::delete_playlist),
        )
        .route(
            "/add/{video_id}/{playlist_id}",
            patch(api::playlist::add_video),
        )
        .route(
            "/remove/{video_id}/{playlist_id}",
            patch(api::playlist::remove_video),
        )
        .route_layer(require_auth());

    let subscription_routes = Router::new()
        .route(
            "/c/{channel_id}",
            get(api::subscription::channel_subscribers)
                .post(api::subscription::toggle_subscription),
        )
        .route(
            "/u/{subscriber_id}",
            get(api::subscription::subscribed_channels),
        )
        .route_layer(require_auth());

    let dashboard_routes = Router::new()
        .route("/stats", get(api::dashboard::channel_stats))
        .route("/videos", get(api::dashboard::channel_videos))
        .route_layer(require_auth());

    let api_routes = Router::new()
        .route("/healthcheck", get(api::healthcheck))
        .nest("/users", user_routes)
        .nest("/videos", video_routes)
        .nest("/tweets", tweet_routes)
        .nest("/comments", comment_routes)
        .nest("/likes", like_routes)
        .nest("/playlist", playlist_routes)
        .nest("/subscriptions", subscription_routes)
        .nest("/dashboard", dashboard_routes);

    let mut app = Router::new().nest("/api/v1", api_routes);
    if let StorageConfig::Local(local) = &state.config.storage {
        let mount = local.public_url.trim_end_matches('/');
        if mount.starts_with('/') {
            app = app.nest_service(mount, ServeDir::new(&local.path));
        }
    }

    let body_limit = state.config.max_file_size.as_u64() as usize;
    Ok(app
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Credentialed CORS for a configured origin, wide open otherwise.
fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let cors = match origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {origin}"))?;
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin))
                .allow_credentials(true)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    Ok(cors.max_age(std::time::Duration::from_secs(3600)))
}

pub(crate) struct AppState {
    pub(crate) user_svc: UserService,
    pub(crate) video_svc: VideoService,
    pub(crate) tweet_svc: TweetService,
    pub(crate) comment_svc: CommentService,
    pub(crate) like_svc: LikeService,
    pub(crate) playlist_svc: PlaylistService,
    pub(crate) subscription_svc: SubscriptionService,
    pub(crate) dashboard_svc: DashboardService,
    pub(crate) media: MediaService,
    pub(crate) config: Config,
}

impl AppState {
    pub async fn new(db: DatabaseConnection, config: Config) -> anyhow::Result<Arc<Self>> {
        let storage = Arc::new(
            Storage::new(&config.storage)
                .await
                .context("Failed to create storage")?,
        );
        let tmp_dir = PathBuf::from(&config.tmp_dir);
        std::fs::create_dir_all(&tmp_dir).with_context(|| {
            format!(
                "Failed to create temporary directory: {}",
                tmp_dir.display()
            )
        })?;
        let media = MediaService::new(tmp_dir, storage);

        // Data layer
        let user_data = UserData::new(db.clone());
        let video_data = VideoData::new(db.clone());
        let tweet_data = TweetData::new(db.clone());
        let comment_data = CommentData::new(db.clone());
        let like_data = LikeData::new(db.clone());
        let playlist_data = PlaylistData::new(db.clone());
        let subscription_data = SubscriptionData::new(db);

        // Services on top of it
        Ok(Arc::new(AppState {
            user_svc: UserService::new(
                user_data.clone(),
                subscription_data.clone(),
                media.clone(),
                config.auth.clone(),
            ),
            video_svc: VideoService::new(video_data.clone(), user_data.clone(), media.clone()),
            tweet_svc: TweetService::new(tweet_data.clone()),
            comment_svc: CommentService::new(comment_data.clone(), video_data.clone()),
            like_svc: LikeService::new(
                like_data.clone(),
                video_data.clone(),
                comment_data,
                tweet_data,
            ),
            playlist_svc: PlaylistService::new(playlist_data, video_data.clone()),
            subscription_svc: SubscriptionService::new(subscription_data.clone(), user_data),
            dashboard_svc: DashboardService::new(video_data, like_data, subscription_data),
            media,
            config,
        }))
    }
}
