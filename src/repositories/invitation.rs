//! # Invitation Repository
//!
//! Invitations are ordinary studio→talent messages linked to a casting call.
//! A batch is written in one transaction: if any recipient is rejected by the
//! foreign key on `talent_receiver_id`, nothing is committed.

use std::collections::{HashMap, HashSet};

use crate::error::RepositoryError;
use crate::models::application::{ApplicationStatus, Model as ApplicationModel};
use crate::models::casting_call::Model as CastingCallModel;
use crate::models::message::{
    Column as MessageColumn, Entity as MessageRow, Message, NewMessage, Party,
};
use crate::repositories::message::into_message;
use crate::repositories::{ApplicationRepository, ProfileRepository};
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// An invitation together with the invited talent's response, if any
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationView {
    #[serde(flatten)]
    pub message: Message,
    pub talent_id: Option<Uuid>,
    pub talent_name: Option<String>,
    /// Whether the talent has applied to the casting call
    pub has_responded: bool,
    pub response_status: Option<ApplicationStatus>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub response_date: Option<DateTimeWithTimeZone>,
}

/// Collapse duplicate ids, keeping the first occurrence of each.
pub fn dedupe_talent_ids(talent_ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(talent_ids.len());
    talent_ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub fn invitation_subject(casting_call: &CastingCallModel) -> String {
    format!("Invitation: {}", casting_call.title)
}

pub fn default_invitation_content(casting_call: &CastingCallModel) -> String {
    format!(
        "You have been invited to apply for \"{}\". Open the casting call to review the role and submit your application.",
        casting_call.title
    )
}

/// One message per talent id, all sharing subject and content.
pub fn build_invitations(
    studio_id: Uuid,
    casting_call: &CastingCallModel,
    talent_ids: &[Uuid],
    content: Option<&str>,
) -> Vec<NewMessage> {
    let subject = invitation_subject(casting_call);
    let content = content
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| default_invitation_content(casting_call));

    talent_ids
        .iter()
        .map(|talent_id| NewMessage {
            sender: Party::Studio { id: studio_id },
            receiver: Party::Talent { id: *talent_id },
            subject: subject.clone(),
            content: content.clone(),
            related_to_project_id: casting_call.project_id,
            related_to_casting_call_id: Some(casting_call.id),
        })
        .collect()
}

pub struct InvitationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InvitationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert every invitation or none; returns how many were written.
    pub async fn send_batch(&self, invitations: Vec<NewMessage>) -> Result<usize, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        match Self::insert_all(&txn, invitations).await {
            Ok(count) => {
                txn.commit()
                    .await
                    .map_err(RepositoryError::database_error)?;
                Ok(count)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back invitation batch");
                }
                Err(err)
            }
        }
    }

    async fn insert_all(
        txn: &DatabaseTransaction,
        invitations: Vec<NewMessage>,
    ) -> Result<usize, RepositoryError> {
        let now = Utc::now().into();
        let mut inserted = 0;
        for invitation in invitations {
            let active = invitation
                .into_active_model(now)
                .map_err(|err| RepositoryError::Validation(err.to_string()))?;
            MessageRow::insert(active)
                .exec_without_returning(txn)
                .await
                .map_err(RepositoryError::database_error)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Invitations the studio sent for a casting call, newest first, each
    /// joined in memory against the applications of the invited profiles.
    pub async fn list_for_casting_call(
        &self,
        studio_id: Uuid,
        casting_call_id: Uuid,
    ) -> Result<Vec<InvitationView>, RepositoryError> {
        let rows = MessageRow::find()
            .filter(MessageColumn::StudioSenderId.eq(studio_id))
            .filter(MessageColumn::TalentReceiverId.is_not_null())
            .filter(MessageColumn::RelatedToCastingCallId.eq(casting_call_id))
            .order_by_desc(MessageColumn::CreatedAt)
            .order_by_desc(MessageColumn::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        let invitations = rows
            .into_iter()
            .map(into_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut profile_ids: Vec<Uuid> = invitations
            .iter()
            .filter_map(|message| message.receiver.talent_id())
            .collect();
        profile_ids.sort_unstable();
        profile_ids.dedup();

        let applications: HashMap<Uuid, ApplicationModel> = ApplicationRepository::new(self.db)
            .list_for_profiles(casting_call_id, profile_ids.clone())
            .await?
            .into_iter()
            .map(|application| (application.profile_id, application))
            .collect();

        let names = ProfileRepository::new(self.db)
            .display_names(profile_ids)
            .await?;

        Ok(invitations
            .into_iter()
            .map(|message| {
                let talent_id = message.receiver.talent_id();
                let application = talent_id.and_then(|id| applications.get(&id));
                InvitationView {
                    talent_id,
                    talent_name: talent_id.and_then(|id| names.get(&id).cloned()),
                    has_responded: application.is_some(),
                    response_status: application.map(|a| a.status),
                    response_date: application.map(|a| a.created_at),
                    message,
                }
            })
            .collect())
    }
}
