//! Fixtures shared by the unit tests: an in-memory database with the schema
//! applied, a throwaway media root and a few row builders.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use ctor::ctor;
use migration::{Migrator, MigratorTrait};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::config::{AuthConfig, Config};
use crate::core::entity::{user, video};
use crate::core::password;
use crate::core::storage::StorageConfig;
use crate::server::AppState;
use crate::storage::local::LocalStorageConfig;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

static TEST_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| password::hash_password(TEST_PASSWORD).unwrap());

#[ctor]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("debug,sqlx=warn")
        .with_test_writer()
        .init();
}

pub async fn setup_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn temp_root() -> PathBuf {
    std::env::temp_dir().join(format!("vidtube-test-{}", Uuid::new_v4()))
}

pub fn test_config(root: &std::path::Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_file_size: bytesize::ByteSize::mib(16),
        database_url: "sqlite::memory:".to_string(),
        tmp_dir: root.join("tmp").to_string_lossy().into_owned(),
        cors_origin: None,
        storage: StorageConfig::Local(LocalStorageConfig {
            path: root.join("media").to_string_lossy().into_owned(),
            public_url: "/media".to_string(),
        }),
        auth: AuthConfig {
            access_token_secret: "test-access-secret".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_secret: "test-refresh-secret".to_string(),
            refresh_token_expiry_days: 1,
            secure_cookies: false,
        },
    }
}

/// Full application state over a fresh database. The returned path is the
/// media root to clean up afterwards.
pub async fn test_state() -> (Arc<AppState>, DatabaseConnection, PathBuf) {
    let db = setup_db().await;
    let root = temp_root();
    let state = AppState::new(db.clone(), test_config(&root)).await.unwrap();
    (state, db, root)
}

pub async fn insert_user(db: &DatabaseConnection, username: &str) -> user::Model {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        full_name: Set(format!("{username} full")),
        avatar: Set(format!("/media/{username}.png")),
        cover_image: Set(String::new()),
        password: Set(TEST_PASSWORD_HASH.clone()),
        refresh_token: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_video(
    db: &DatabaseConnection,
    owner_id: i64,
    title: &str,
    is_published: bool,
) -> video::Model {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    video::ActiveModel {
        owner_id: Set(owner_id),
        video_file: Set(format!("/media/{title}.mp4")),
        thumbnail: Set(format!("/media/{title}.png")),
        title: Set(title.to_string()),
        description: Set(format!("about {title}")),
        views: Set(0),
        is_published: Set(is_published),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
