//! # Application Repository

use crate::error::RepositoryError;
use crate::models::application::{
    ActiveModel as ApplicationActiveModel, ApplicationStatus, Column as ApplicationColumn,
    Entity as Application, Model as ApplicationModel,
};
use crate::models::profile::{Entity as Profile, Model as ProfileModel};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

pub struct ApplicationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a talent's application; a second application to the same call
    /// is a conflict.
    pub async fn create(
        &self,
        profile_id: Uuid,
        casting_call_id: Uuid,
        cover_note: Option<String>,
    ) -> Result<ApplicationModel, RepositoryError> {
        let now = Utc::now();
        let application = ApplicationActiveModel {
            id: Set(Uuid::new_v4()),
            profile_id: Set(profile_id),
            casting_call_id: Set(casting_call_id),
            status: Set(ApplicationStatus::Pending),
            cover_note: Set(cover_note),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        application
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationModel>, RepositoryError> {
        Application::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Applications for a casting call with the applicant profile, newest first
    pub async fn list_with_profiles(
        &self,
        casting_call_id: Uuid,
    ) -> Result<Vec<(ApplicationModel, Option<ProfileModel>)>, RepositoryError> {
        Application::find()
            .filter(ApplicationColumn::CastingCallId.eq(casting_call_id))
            .order_by_desc(ApplicationColumn::CreatedAt)
            .order_by_desc(ApplicationColumn::Id)
            .find_also_related(Profile)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Applications on a casting call from any of `profile_ids`
    pub async fn list_for_profiles(
        &self,
        casting_call_id: Uuid,
        profile_ids: Vec<Uuid>,
    ) -> Result<Vec<ApplicationModel>, RepositoryError> {
        if profile_ids.is_empty() {
            return Ok(Vec::new());
        }

        Application::find()
            .filter(ApplicationColumn::CastingCallId.eq(casting_call_id))
            .filter(ApplicationColumn::ProfileId.is_in(profile_ids))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update_status(
        &self,
        existing: ApplicationModel,
        status: ApplicationStatus,
    ) -> Result<ApplicationModel, RepositoryError> {
        let mut active = existing.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
