use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // target_id is polymorphic over videos, comments and tweets, so it
        // carries no foreign key
        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Likes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Likes::LikedBy).not_null())
                    .col(string_len(Likes::TargetKind, 16).not_null())
                    .col(big_integer(Likes::TargetId).not_null())
                    .col(timestamp_with_time_zone(Likes::CreatedAt).not_null())
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_likes_liked_by")
                            .from(Likes::Table, Likes::LikedBy)
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
                    .table(Likes::Table)
                    .name("idx_likes_unique")
                    .unique()
                    .col(Likes::LikedBy)
                    .col(Likes::TargetKind)
                    .col(Likes::TargetId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Likes::Table)
                    .name("idx_likes_target")
                    .col(Likes::TargetKind)
                    .col(Likes::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Subscriptions::SubscriberId).not_null())
                    .col(big_integer(Subscriptions::ChannelId).not_null())
                    .col(timestamp_with_time_zone(Subscriptions::CreatedAt).not_null())
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_subscriptions_subscriber")
                            .from(Subscriptions::Table, Subscriptions::SubscriberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .to_owned(),
                    )
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name("fk_subscriptions_channel")
                            .from(Subscriptions::Table, Subscriptions::ChannelId)
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
                    .table(Subscriptions::Table)
                    .name("idx_subscriptions_unique")
                    .unique()
                    .col(Subscriptions::SubscriberId)
                    .col(Subscriptions::ChannelId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Subscriptions::Table)
                    .name("idx_subscriptions_channel")
                    .col(Subscriptions::ChannelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Subscriptions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Likes::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Likes {
    Table,
    Id,
    LikedBy,
    TargetKind,
    TargetId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    SubscriberId,
    ChannelId,
    CreatedAt,
}
