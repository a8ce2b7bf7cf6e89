//! Migration to create the casting_calls table.
//!
//! Skills are stored as a JSON array of tags; status is a plain string
//! enumeration (`OPEN`, `CLOSED`, `FILLED`) with no transition rules.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CastingCalls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CastingCalls::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CastingCalls::StudioId).uuid().not_null())
                    .col(ColumnDef::new(CastingCalls::ProjectId).uuid().null())
                    .col(ColumnDef::new(CastingCalls::Title).text().not_null())
                    .col(ColumnDef::new(CastingCalls::Description).text().null())
                    .col(
                        ColumnDef::new(CastingCalls::Status)
                            .string_len(16)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(ColumnDef::new(CastingCalls::Location).text().null())
                    .col(ColumnDef::new(CastingCalls::Skills).json_binary().not_null())
                    .col(ColumnDef::new(CastingCalls::Compensation).text().null())
                    .col(
                        ColumnDef::new(CastingCalls::ApplicationDeadline)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CastingCalls::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CastingCalls::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_casting_calls_studio_id")
                            .from(CastingCalls::Table, CastingCalls::StudioId)
                            .to(Studios::Table, Studios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_casting_calls_studio_created")
                    .table(CastingCalls::Table)
                    .col(CastingCalls::StudioId)
                    .col(CastingCalls::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_casting_calls_studio_created")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CastingCalls::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CastingCalls {
    Table,
    Id,
    StudioId,
    ProjectId,
    Title,
    Description,
    Status,
    Location,
    Skills,
    Compensation,
    ApplicationDeadline,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Studios {
    Table,
    Id,
}
