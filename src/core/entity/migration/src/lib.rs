pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user;
mod m20250601_000002_create_video;
mod m20250601_000003_create_playlists;
mod m20250601_000004_create_tweet_comment;
mod m20250601_000005_create_like_subscription;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user::Migration),
            Box::new(m20250601_000002_create_video::Migration),
            Box::new(m20250601_000003_create_playlists::Migration),
            Box::new(m20250601_000004_create_tweet_comment::Migration),
            Box::new(m20250601_000005_create_like_subscription::Migration),
        ]
    }
}
