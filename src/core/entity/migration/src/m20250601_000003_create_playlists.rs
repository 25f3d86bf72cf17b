use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Playlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Playlists::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Playlists::Name).not_null())
                    .col(string(Playlists::Description).not_null())
                    .col(big_integer(Playlists::OwnerId).not_null())
                    .col(timestamp_with_time_zone(Playlists::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Playlists::UpdatedAt).not_null())
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_playlists_owner")
                            .from(Playlists::Table, Playlists::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistVideos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlaylistVideos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(PlaylistVideos::PlaylistId).not_null())
                    .col(big_integer(PlaylistVideos::VideoId).not_null())
                    .col(timestamp_with_time_zone(PlaylistVideos::CreatedAt).not_null())
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_playlist_videos_playlist")
                            .from(PlaylistVideos::Table, PlaylistVideos::PlaylistId)
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .to_owned(),
                    )
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_playlist_videos_video")
                            .from(PlaylistVideos::Table, PlaylistVideos::VideoId)
                            .to(Videos::Table, Videos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Playlists::Table)
                    .name("idx_playlists_owner")
                    .col(Playlists::OwnerId)
                    .to_owned(),
            )
            .await?;

        // a playlist holds each video at most once
        manager
            .create_index(
                Index::create()
                    .table(PlaylistVideos::Table)
                    .name("idx_playlist_videos_unique")
                    .unique()
                    .col(PlaylistVideos::PlaylistId)
                    .col(PlaylistVideos::VideoId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PlaylistVideos::Table)
                    .name("idx_playlist_videos_video")
                    .col(PlaylistVideos::VideoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PlaylistVideos::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Playlists::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Videos {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Playlists {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlaylistVideos {
    Table,
    Id,
    PlaylistId,
    VideoId,
    CreatedAt,
}
