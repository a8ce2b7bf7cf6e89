//! # Studio Repository
//!
//! Studios are created on demand: the first time a user of a `STUDIO` tenant
//! reaches the API, a studio named after the tenant is inserted for it.

use crate::error::RepositoryError;
use crate::models::studio::{
    ActiveModel as StudioActiveModel, Column as StudioColumn, Entity as Studio,
    Model as StudioModel,
};
use crate::models::tenant::Model as TenantModel;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Repository for Studio database operations
pub struct StudioRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StudioRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find the studio owned by a tenant
    pub async fn find_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<StudioModel>, RepositoryError> {
        Studio::find()
            .filter(StudioColumn::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Return the tenant's studio, creating it if this is the first visit.
    ///
    /// Two concurrent first visits race on the unique `tenant_id` index; the
    /// loser re-reads the winner's row.
    pub async fn get_or_create_for_tenant(
        &self,
        tenant: &TenantModel,
    ) -> Result<StudioModel, RepositoryError> {
        if let Some(studio) = self.find_by_tenant(tenant.id).await? {
            return Ok(studio);
        }

        let now = Utc::now();
        let studio = StudioActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.id),
            name: Set(tenant.name.clone()),
            description: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        match studio.insert(self.db).await {
            Ok(created) => {
                tracing::info!(tenant_id = %tenant.id, studio_id = %created.id, "Created studio for tenant");
                Ok(created)
            }
            Err(err) => match RepositoryError::database_error(err) {
                RepositoryError::Conflict(_) => self
                    .find_by_tenant(tenant.id)
                    .await?
                    .ok_or(RepositoryError::NotFound("Studio")),
                other => Err(other),
            },
        }
    }
}
