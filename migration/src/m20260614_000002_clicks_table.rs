//! Clicks table migration
//!
//! One row per recorded visit through a link's redirect: timestamp,
//! referrer, user agent, IP address and best-effort geolocation.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Clicks::LinkId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clicks::IpAddress)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Clicks::UserAgent).text().not_null())
                    .col(ColumnDef::new(Clicks::Referrer).text().not_null())
                    .col(ColumnDef::new(Clicks::Country).string_len(2).null())
                    .col(ColumnDef::new(Clicks::City).string_len(100).null())
                    .col(
                        ColumnDef::new(Clicks::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clicks_link_id")
                            .from(Clicks::Table, Clicks::LinkId)
                            .to(Links::Table, Links::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // single-link history lookup
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clicks_link_id")
                    .table(Clicks::Table)
                    .col(Clicks::LinkId)
                    .to_owned(),
            )
            .await?;

        // single-link recent-feed queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clicks_link_time")
                    .table(Clicks::Table)
                    .col(Clicks::LinkId)
                    .col(Clicks::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_clicks_link_time").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_clicks_link_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Clicks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Clicks {
    #[sea_orm(iden = "clicks")]
    Table,
    Id,
    LinkId,
    IpAddress,
    UserAgent,
    Referrer,
    Country,
    City,
    ClickedAt,
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
}
