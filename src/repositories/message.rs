//! # Message Repository
//!
//! Mailbox reads and writes scoped to a studio. Authorization happens in the
//! caller; every method here trusts the ids it is given.

use crate::error::RepositoryError;
use crate::models::casting_call::Entity as CastingCall;
use crate::models::message::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as MessageRow, Message,
    Model as MessageModel, NewMessage, PartyError,
};
use crate::models::studio::Model as StudioModel;
use crate::repositories::ProfileRepository;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Which mailbox to list
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter {
    /// `true` lists outbound messages, `false` inbound
    pub sent: bool,
    /// Restrict to archived or unarchived messages
    pub archived: Option<bool>,
}

/// Flags a studio may flip on a message
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFlags {
    pub is_read: Option<bool>,
    pub is_archived: Option<bool>,
}

impl MessageFlags {
    pub fn is_empty(&self) -> bool {
        self.is_read.is_none() && self.is_archived.is_none()
    }
}

/// A mailbox entry with display fields for both parties
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    #[serde(flatten)]
    pub message: Message,
    /// Display name of the talent on the other side
    pub talent_name: Option<String>,
    pub studio_name: String,
    /// Title of the related casting call, if any
    pub casting_call_title: Option<String>,
}

pub(crate) fn into_message(row: MessageModel) -> Result<Message, RepositoryError> {
    let id = row.id;
    Message::try_from(row).map_err(|err: PartyError| {
        tracing::error!(message_id = %id, error = %err, "Malformed message row");
        RepositoryError::Integrity(format!("message {id}: {err}"))
    })
}

pub struct MessageRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MessageRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// List the studio's inbox or outbox, newest first.
    pub async fn list_for_studio(
        &self,
        studio: &StudioModel,
        filter: MessageFilter,
    ) -> Result<Vec<MessageSummary>, RepositoryError> {
        let mailbox = if filter.sent {
            MessageColumn::StudioSenderId.eq(studio.id)
        } else {
            MessageColumn::StudioReceiverId.eq(studio.id)
        };

        let mut query = MessageRow::find().filter(mailbox);
        if let Some(archived) = filter.archived {
            query = query.filter(MessageColumn::IsArchived.eq(archived));
        }

        let rows = query
            .order_by_desc(MessageColumn::CreatedAt)
            .order_by_desc(MessageColumn::Id)
            .find_also_related(CastingCall)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        let mut entries = Vec::with_capacity(rows.len());
        for (row, casting_call) in rows {
            entries.push((into_message(row)?, casting_call.map(|call| call.title)));
        }

        let names = ProfileRepository::new(self.db)
            .display_names(entries.iter().filter_map(|(message, _)| message.talent_party()))
            .await?;

        Ok(entries
            .into_iter()
            .map(|(message, casting_call_title)| MessageSummary {
                talent_name: message
                    .talent_party()
                    .and_then(|id| names.get(&id).cloned()),
                studio_name: studio.name.clone(),
                casting_call_title,
                message,
            })
            .collect())
    }

    pub async fn create(&self, new_message: NewMessage) -> Result<Message, RepositoryError> {
        let active = new_message
            .into_active_model(Utc::now().into())
            .map_err(|err| RepositoryError::Validation(err.to_string()))?;

        let row = active
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        into_message(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, RepositoryError> {
        MessageRow::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .map(into_message)
            .transpose()
    }

    /// Set `is_read = true` in one statement, whatever its current value.
    pub async fn mark_read(&self, id: Uuid) -> Result<(), RepositoryError> {
        MessageRow::update_many()
            .col_expr(MessageColumn::IsRead, Expr::value(true))
            .col_expr(
                MessageColumn::UpdatedAt,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())),
            )
            .filter(MessageColumn::Id.eq(id))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Apply the provided flags and return the updated message.
    pub async fn update_flags(
        &self,
        id: Uuid,
        flags: MessageFlags,
    ) -> Result<Message, RepositoryError> {
        if flags.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or(RepositoryError::NotFound("Message"));
        }

        let mut active = MessageActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(is_read) = flags.is_read {
            active.is_read = Set(is_read);
        }
        if let Some(is_archived) = flags.is_archived {
            active.is_archived = Set(is_archived);
        }
        active.updated_at = Set(Utc::now().into());

        let row = active
            .update(self.db)
            .await
            .map_err(|err| match err {
                sea_orm::DbErr::RecordNotUpdated => RepositoryError::NotFound("Message"),
                other => RepositoryError::database_error(other),
            })?;

        into_message(row)
    }

    /// Hard delete; returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = MessageRow::delete_by_id(id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected > 0)
    }
}
