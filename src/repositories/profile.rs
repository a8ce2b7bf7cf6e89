//! # Profile Repository
//!
//! Talent profiles are read by the studio API to resolve message recipients
//! and decorate listings with display names.

use std::collections::HashMap;

use crate::error::RepositoryError;
use crate::models::profile::{
    ActiveModel as ProfileActiveModel, Column as ProfileColumn, Entity as Profile,
    Model as ProfileModel,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Request data for creating a talent profile
#[derive(Debug, Clone)]
pub struct CreateProfileRequest {
    pub user_id: Uuid,
    pub display_name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
}

pub struct ProfileRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CreateProfileRequest) -> Result<ProfileModel, RepositoryError> {
        let now = Utc::now();
        let profile = ProfileActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(request.user_id),
            display_name: Set(request.display_name),
            headline: Set(request.headline),
            location: Set(request.location),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        profile
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileModel>, RepositoryError> {
        Profile::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Display names keyed by profile id; unknown ids are simply absent.
    pub async fn display_names(
        &self,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, String>, RepositoryError> {
        let mut ids: Vec<Uuid> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let profiles = Profile::find()
            .filter(ProfileColumn::Id.is_in(ids))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(profiles
            .into_iter()
            .map(|profile| (profile.id, profile.display_name))
            .collect())
    }
}
