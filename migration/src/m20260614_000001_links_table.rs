use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Links::DestinationUrl)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::ShortCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::Source)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::TotalClicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // short_code is the redirect lookup key and must be unique
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_short_code")
                    .table(Links::Table)
                    .col(Links::ShortCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // listing is newest-first
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_created_at")
                    .table(Links::Table)
                    .col(Links::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_short_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    DestinationUrl,
    ShortCode,
    Title,
    Source,
    CreatedAt,
    TotalClicks,
}
