//! Migration to create the messages table.
//!
//! Sender and receiver are each stored as a pair of nullable foreign keys
//! (studio side and talent side) so the store enforces referential integrity.
//! Check constraints require exactly one column of each pair to be set.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Messages::Subject).text().not_null())
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(ColumnDef::new(Messages::StudioSenderId).uuid().null())
                    .col(ColumnDef::new(Messages::TalentSenderId).uuid().null())
                    .col(ColumnDef::new(Messages::StudioReceiverId).uuid().null())
                    .col(ColumnDef::new(Messages::TalentReceiverId).uuid().null())
                    .col(ColumnDef::new(Messages::RelatedToProjectId).uuid().null())
                    .col(ColumnDef::new(Messages::RelatedToCastingCallId).uuid().null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Messages::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Messages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Messages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::cust(
                        "(studio_sender_id IS NULL) <> (talent_sender_id IS NULL)",
                    ))
                    .check(Expr::cust(
                        "(studio_receiver_id IS NULL) <> (talent_receiver_id IS NULL)",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_studio_sender_id")
                            .from(Messages::Table, Messages::StudioSenderId)
                            .to(Studios::Table, Studios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_talent_sender_id")
                            .from(Messages::Table, Messages::TalentSenderId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_studio_receiver_id")
                            .from(Messages::Table, Messages::StudioReceiverId)
                            .to(Studios::Table, Studios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_talent_receiver_id")
                            .from(Messages::Table, Messages::TalentReceiverId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_related_casting_call_id")
                            .from(Messages::Table, Messages::RelatedToCastingCallId)
                            .to(CastingCalls::Table, CastingCalls::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Mailbox listings filter on one party column and sort by recency.
        for (name, column) in [
            ("idx_messages_studio_sender_id", Messages::StudioSenderId),
            ("idx_messages_studio_receiver_id", Messages::StudioReceiverId),
            (
                "idx_messages_related_casting_call_id",
                Messages::RelatedToCastingCallId,
            ),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Messages::Table)
                        .col(column)
                        .col(Messages::CreatedAt)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_messages_studio_sender_id",
            "idx_messages_studio_receiver_id",
            "idx_messages_related_casting_call_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    Subject,
    Content,
    StudioSenderId,
    TalentSenderId,
    StudioReceiverId,
    TalentReceiverId,
    RelatedToProjectId,
    RelatedToCastingCallId,
    IsRead,
    IsArchived,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Studios {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CastingCalls {
    Table,
    Id,
}
