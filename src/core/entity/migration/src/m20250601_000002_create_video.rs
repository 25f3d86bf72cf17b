use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Videos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Videos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Videos::OwnerId).not_null())
                    .col(string(Videos::VideoFile).not_null())
                    .col(string(Videos::Thumbnail).not_null())
                    .col(string(Videos::Title).not_null())
                    .col(text(Videos::Description).not_null())
                    .col(big_integer(Videos::Views).not_null().default(0))
                    .col(boolean(Videos::IsPublished).not_null().default(true))
                    .col(timestamp_with_time_zone(Videos::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Videos::UpdatedAt).not_null())
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_videos_owner")
                            .from(Videos::Table, Videos::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Videos::Table)
                    .name("idx_videos_owner_created")
                    .col(Videos::OwnerId)
                    .col(Videos::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WatchHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WatchHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(WatchHistory::UserId).not_null())
                    .col(big_integer(WatchHistory::VideoId).not_null())
                    .col(timestamp_with_time_zone(WatchHistory::WatchedAt).not_null())
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_watch_history_user")
                            .from(WatchHistory::Table, WatchHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .to_owned(),
                    )
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_watch_history_video")
                            .from(WatchHistory::Table, WatchHistory::VideoId)
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
                    .table(WatchHistory::Table)
                    .name("idx_watch_history_user_video")
                    .unique()
                    .col(WatchHistory::UserId)
                    .col(WatchHistory::VideoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(WatchHistory::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Videos::Table).if_exists().to_owned())
            .await
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
    OwnerId,
    VideoFile,
    Thumbnail,
    Title,
    Description,
    Views,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WatchHistory {
    Table,
    Id,
    UserId,
    VideoId,
    WatchedAt,
}
