//! Migration to create the studios table.
//!
//! A studio is owned by exactly one `STUDIO` tenant; the unique index on
//! `tenant_id` keeps lazy creation from producing duplicates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Studios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Studios::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Studios::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Studios::Name).text().not_null())
                    .col(ColumnDef::new(Studios::Description).text().null())
                    .col(
                        ColumnDef::new(Studios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Studios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_studios_tenant_id")
                            .from(Studios::Table, Studios::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_studios_tenant_id")
                    .table(Studios::Table)
                    .col(Studios::TenantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_studios_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Studios::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Studios {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
