//! # Tenant Repository
//!
//! Lookups and creation for tenants and their users. The authorization guard
//! resolves sessions through these methods.

use crate::error::RepositoryError;
use crate::models::tenant::{
    ActiveModel as TenantActiveModel, Entity as Tenant, Model as TenantModel, TenantKind,
};
use crate::models::user::{ActiveModel as UserActiveModel, Entity as User, Model as UserModel, UserRole};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Request data for creating a new tenant
#[derive(Debug, Clone)]
pub struct CreateTenantRequest {
    pub name: String,
    pub kind: TenantKind,
}

/// Request data for creating a user inside a tenant
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub tenant_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

/// Repository for tenant and user database operations
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new tenant
    pub async fn create_tenant(
        &self,
        request: CreateTenantRequest,
    ) -> Result<TenantModel, RepositoryError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(RepositoryError::Validation(
                "tenant name cannot be empty".to_string(),
            ));
        }

        let tenant = TenantActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            kind: Set(request.kind),
            created_at: Set(Utc::now().into()),
        };

        tenant
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Get tenant by ID
    pub async fn get_tenant_by_id(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<TenantModel>, RepositoryError> {
        Tenant::find_by_id(tenant_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Create a user; emails are unique across the platform
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserModel, RepositoryError> {
        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(request.tenant_id),
            email: Set(request.email.trim().to_lowercase()),
            name: Set(request.name),
            role: Set(request.role),
            created_at: Set(Utc::now().into()),
        };

        user.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, RepositoryError> {
        User::find_by_id(user_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
