//! Message entity model
//!
//! Rows store the sender and receiver across four nullable foreign-key columns
//! so the database enforces referential integrity. The domain type
//! [`Message`] instead carries each side as a [`Party`], and conversion
//! between the two refuses rows that do not name exactly one sender and one
//! receiver of opposite kinds.

use sea_orm::ActiveModelBehavior;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub studio_sender_id: Option<Uuid>,
    pub talent_sender_id: Option<Uuid>,
    pub studio_receiver_id: Option<Uuid>,
    pub talent_receiver_id: Option<Uuid>,
    pub related_to_project_id: Option<Uuid>,
    pub related_to_casting_call_id: Option<Uuid>,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::casting_call::Entity",
        from = "Column::RelatedToCastingCallId",
        to = "super::casting_call::Column::Id"
    )]
    CastingCall,
}

impl Related<super::casting_call::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CastingCall.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One side of a message: either a studio or a talent profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Party {
    Studio { id: Uuid },
    Talent { id: Uuid },
}

impl Party {
    pub fn id(&self) -> Uuid {
        match self {
            Party::Studio { id } | Party::Talent { id } => *id,
        }
    }

    pub fn is_studio(&self, studio_id: Uuid) -> bool {
        matches!(self, Party::Studio { id } if *id == studio_id)
    }

    /// Talent profile id, if this side is a talent.
    pub fn talent_id(&self) -> Option<Uuid> {
        match self {
            Party::Talent { id } => Some(*id),
            Party::Studio { .. } => None,
        }
    }

    fn same_kind(&self, other: &Party) -> bool {
        matches!(
            (self, other),
            (Party::Studio { .. }, Party::Studio { .. }) | (Party::Talent { .. }, Party::Talent { .. })
        )
    }

    /// Splits the party into its `(studio, talent)` column pair.
    fn columns(&self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            Party::Studio { id } => (Some(*id), None),
            Party::Talent { id } => (None, Some(*id)),
        }
    }

    fn from_columns(
        side: &'static str,
        studio: Option<Uuid>,
        talent: Option<Uuid>,
    ) -> Result<Self, PartyError> {
        match (studio, talent) {
            (Some(id), None) => Ok(Party::Studio { id }),
            (None, Some(id)) => Ok(Party::Talent { id }),
            (None, None) => Err(PartyError::Missing(side)),
            (Some(_), Some(_)) => Err(PartyError::Ambiguous(side)),
        }
    }
}

/// Reasons a sender/receiver pair cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("message has no {0}")]
    Missing(&'static str),
    #[error("message has both a studio and a talent {0}")]
    Ambiguous(&'static str),
    #[error("sender and receiver must be of opposite kinds")]
    SameKind,
}

/// A message as seen by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub subject: String,
    pub content: String,
    pub sender: Party,
    pub receiver: Party,
    pub related_to_project_id: Option<Uuid>,
    pub related_to_casting_call_id: Option<Uuid>,
    pub is_read: bool,
    pub is_archived: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl Message {
    /// Whether `studio_id` is the receiving side.
    pub fn is_inbound_to(&self, studio_id: Uuid) -> bool {
        self.receiver.is_studio(studio_id)
    }

    /// Whether `studio_id` is either side of the conversation.
    pub fn involves_studio(&self, studio_id: Uuid) -> bool {
        self.sender.is_studio(studio_id) || self.receiver.is_studio(studio_id)
    }

    /// The talent profile on the other side of the conversation.
    pub fn talent_party(&self) -> Option<Uuid> {
        self.sender.talent_id().or_else(|| self.receiver.talent_id())
    }
}

impl TryFrom<Model> for Message {
    type Error = PartyError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        let sender = Party::from_columns("sender", row.studio_sender_id, row.talent_sender_id)?;
        let receiver =
            Party::from_columns("receiver", row.studio_receiver_id, row.talent_receiver_id)?;
        if sender.same_kind(&receiver) {
            return Err(PartyError::SameKind);
        }

        Ok(Message {
            id: row.id,
            subject: row.subject,
            content: row.content,
            sender,
            receiver,
            related_to_project_id: row.related_to_project_id,
            related_to_casting_call_id: row.related_to_casting_call_id,
            is_read: row.is_read,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields needed to create a message row.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender: Party,
    pub receiver: Party,
    pub subject: String,
    pub content: String,
    pub related_to_project_id: Option<Uuid>,
    pub related_to_casting_call_id: Option<Uuid>,
}

impl NewMessage {
    /// Builds an unread, unarchived row stamped with `now`.
    pub fn into_active_model(self, now: DateTimeWithTimeZone) -> Result<ActiveModel, PartyError> {
        if self.sender.same_kind(&self.receiver) {
            return Err(PartyError::SameKind);
        }
        let (studio_sender_id, talent_sender_id) = self.sender.columns();
        let (studio_receiver_id, talent_receiver_id) = self.receiver.columns();

        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            subject: Set(self.subject),
            content: Set(self.content),
            studio_sender_id: Set(studio_sender_id),
            talent_sender_id: Set(talent_sender_id),
            studio_receiver_id: Set(studio_receiver_id),
            talent_receiver_id: Set(talent_receiver_id),
            related_to_project_id: Set(self.related_to_project_id),
            related_to_casting_call_id: Set(self.related_to_casting_call_id),
            is_read: Set(false),
            is_archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }
}
