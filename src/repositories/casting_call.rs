//! # Casting Call Repository
//!
//! CRUD for casting calls owned by a studio, plus the application count shown
//! on the detail view.

use crate::error::RepositoryError;
use crate::models::application::{Column as ApplicationColumn, Entity as Application};
use crate::models::casting_call::{
    ActiveModel as CastingCallActiveModel, CastingCallStatus, Column as CastingCallColumn,
    Entity as CastingCall, Model as CastingCallModel,
};
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

/// Fields for a new casting call; status always starts `OPEN`
#[derive(Debug, Clone, Default)]
pub struct NewCastingCall {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<Uuid>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub compensation: Option<String>,
    pub application_deadline: Option<DateTimeWithTimeZone>,
}

/// Partial update. The outer `Option` means "leave unchanged"; for nullable
/// columns the inner `None` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CastingCallChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<CastingCallStatus>,
    pub location: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
    pub compensation: Option<Option<String>>,
    pub application_deadline: Option<Option<DateTimeWithTimeZone>>,
    pub project_id: Option<Option<Uuid>>,
}

fn skills_json(skills: Vec<String>) -> Value {
    Value::Array(skills.into_iter().map(Value::String).collect())
}

pub struct CastingCallRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CastingCallRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        studio_id: Uuid,
        request: NewCastingCall,
    ) -> Result<CastingCallModel, RepositoryError> {
        let now = Utc::now();
        let casting_call = CastingCallActiveModel {
            id: Set(Uuid::new_v4()),
            studio_id: Set(studio_id),
            project_id: Set(request.project_id),
            title: Set(request.title),
            description: Set(request.description),
            status: Set(CastingCallStatus::Open),
            location: Set(request.location),
            skills: Set(skills_json(request.skills)),
            compensation: Set(request.compensation),
            application_deadline: Set(request.application_deadline),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        casting_call
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CastingCallModel>, RepositoryError> {
        CastingCall::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Casting calls of a studio, newest first
    pub async fn list_for_studio(
        &self,
        studio_id: Uuid,
        status: Option<CastingCallStatus>,
    ) -> Result<Vec<CastingCallModel>, RepositoryError> {
        let mut query = CastingCall::find().filter(CastingCallColumn::StudioId.eq(studio_id));
        if let Some(status) = status {
            query = query.filter(CastingCallColumn::Status.eq(status));
        }

        query
            .order_by_desc(CastingCallColumn::CreatedAt)
            .order_by_desc(CastingCallColumn::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn count_applications(&self, casting_call_id: Uuid) -> Result<u64, RepositoryError> {
        Application::find()
            .filter(ApplicationColumn::CastingCallId.eq(casting_call_id))
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Apply `changes` to an already-loaded casting call
    pub async fn update(
        &self,
        existing: CastingCallModel,
        changes: CastingCallChanges,
    ) -> Result<CastingCallModel, RepositoryError> {
        let mut active = existing.into_active_model();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(location) = changes.location {
            active.location = Set(location);
        }
        if let Some(skills) = changes.skills {
            active.skills = Set(skills_json(skills));
        }
        if let Some(compensation) = changes.compensation {
            active.compensation = Set(compensation);
        }
        if let Some(deadline) = changes.application_deadline {
            active.application_deadline = Set(deadline);
        }
        if let Some(project_id) = changes.project_id {
            active.project_id = Set(project_id);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Hard delete. Applications cascade; related messages keep their row
    /// with the casting-call link cleared.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = CastingCall::delete_by_id(id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected > 0)
    }
}
