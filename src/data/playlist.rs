use sea_orm::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{Order, QueryOrder, Set, TransactionTrait};

use crate::core::entity::{playlist, playlist_video};
use crate::data::page::{Page, PageQuery, fetch_page};

#[derive(Clone)]
pub struct PlaylistData {
    db: DatabaseConnection,
}

impl PlaylistData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_playlist(
        &self,
        playlist: playlist::ActiveModel,
    ) -> Result<playlist::Model, DbErr> {
        playlist.insert(&self.db).await
    }

    pub async fn list_playlists_by_owner(
        &self,
        owner_id: i64,
        page: PageQuery,
    ) -> Result<Page<playlist::Model>, DbErr> {
        let select = playlist::Entity::find()
            .filter(playlist::Column::OwnerId.eq(owner_id))
            .order_by(playlist::Column::CreatedAt, Order::Desc)
            .order_by(playlist::Column::Id, Order::Desc);
        fetch_page(&self.db, select, page).await
    }

    pub async fn get_playlist(&self, id: i64) -> Result<Option<playlist::Model>, DbErr> {
        playlist::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn get_owned_playlist(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<playlist::Model>, DbErr> {
        playlist::Entity::find_by_id(id)
            .filter(playlist::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
    }

    pub async fn update_playlist(
        &self,
        playlist: playlist::ActiveModel,
    ) -> Result<playlist::Model, DbErr> {
        playlist.update(&self.db).await
    }

    pub async fn delete_playlist(&self, playlist: playlist::Model) -> Result<(), DbErr> {
        let tx = self.db.begin().await?;
        playlist_video::Entity::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist.id))
            .exec(&tx)
            .await?;
        playlist.delete(&tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Adds `video_id` to the playlist. Adding a member twice is a no-op.
    pub async fn add_video(&self, playlist_id: i64, video_id: i64) -> Result<(), DbErr> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let entry = playlist_video::ActiveModel {
            playlist_id: Set(playlist_id),
            video_id: Set(video_id),
            created_at: Set(now),
            ..Default::default()
        };
        playlist_video::Entity::insert(entry)
            .on_conflict(
                OnConflict::columns([
                    playlist_video::Column::PlaylistId,
                    playlist_video::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Removes `video_id` from the playlist, returning whether it was a member.
    pub async fn remove_video(&self, playlist_id: i64, video_id: i64) -> Result<bool, DbErr> {
        let res = playlist_video::Entity::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
