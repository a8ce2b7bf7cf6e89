//! Test utilities for database and API testing.
//!
//! Provides an in-memory SQLite database with all migrations applied, account
//! fixtures built through the repositories, and a thin request helper around
//! the application router.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use casting::{
    auth::encode_session_token,
    config::AppConfig,
    models::{
        application::Model as ApplicationModel, casting_call::Model as CastingCallModel,
        profile::Model as ProfileModel, studio::Model as StudioModel, tenant::TenantKind,
        user::UserRole,
    },
    repositories::{
        ApplicationRepository, CastingCallRepository, CreateProfileRequest, CreateTenantRequest,
        CreateUserRequest, NewCastingCall, ProfileRepository, StudioRepository, TenantRepository,
    },
    server::{AppState, create_app},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool holds a single connection so every query sees the same database.
/// SQLite enforces foreign keys on this connection.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// A studio account: tenant, signed-in user and the studio row behind it.
pub struct StudioAccount {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub studio: StudioModel,
}

impl StudioAccount {
    pub fn studio_id(&self) -> Uuid {
        self.studio.id
    }
}

/// A talent account with its public profile.
pub struct TalentAccount {
    pub user_id: Uuid,
    pub profile: ProfileModel,
}

impl TalentAccount {
    pub fn profile_id(&self) -> Uuid {
        self.profile.id
    }
}

async fn create_account(db: &DatabaseConnection, name: &str, kind: TenantKind) -> Result<(Uuid, Uuid)> {
    let accounts = TenantRepository::new(db);
    let tenant = accounts
        .create_tenant(CreateTenantRequest {
            name: name.to_string(),
            kind,
        })
        .await?;
    let user = accounts
        .create_user(CreateUserRequest {
            tenant_id: tenant.id,
            email: format!("{}@example.com", Uuid::new_v4()),
            name: Some(format!("{name} owner")),
            role: UserRole::User,
        })
        .await?;
    Ok((tenant.id, user.id))
}

/// Creates a `STUDIO` tenant, a user in it and its studio row.
pub async fn create_studio_account(db: &DatabaseConnection, name: &str) -> Result<StudioAccount> {
    let (tenant_id, user_id) = create_account(db, name, TenantKind::Studio).await?;
    let tenant = TenantRepository::new(db)
        .get_tenant_by_id(tenant_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("tenant {tenant_id} vanished"))?;
    let studio = StudioRepository::new(db)
        .get_or_create_for_tenant(&tenant)
        .await?;

    Ok(StudioAccount {
        tenant_id,
        user_id,
        studio,
    })
}

/// Creates a `TALENT` tenant, a user in it and the user's profile.
pub async fn create_talent(db: &DatabaseConnection, display_name: &str) -> Result<TalentAccount> {
    let (_, user_id) = create_account(db, display_name, TenantKind::Talent).await?;
    let profile = ProfileRepository::new(db)
        .create(CreateProfileRequest {
            user_id,
            display_name: display_name.to_string(),
            headline: Some("Actor".to_string()),
            location: Some("Lisbon".to_string()),
        })
        .await?;

    Ok(TalentAccount { user_id, profile })
}

pub async fn create_casting_call(
    db: &DatabaseConnection,
    studio_id: Uuid,
    title: &str,
) -> Result<CastingCallModel> {
    Ok(CastingCallRepository::new(db)
        .create(
            studio_id,
            NewCastingCall {
                title: title.to_string(),
                skills: vec!["acting".to_string()],
                ..Default::default()
            },
        )
        .await?)
}

pub async fn create_application(
    db: &DatabaseConnection,
    profile_id: Uuid,
    casting_call_id: Uuid,
) -> Result<ApplicationModel> {
    Ok(ApplicationRepository::new(db)
        .create(profile_id, casting_call_id, Some("Keen to audition".to_string()))
        .await?)
}

/// Router plus the state behind it.
pub struct TestApp {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    router: Router,
}

/// Response status with the parsed JSON body (`Null` for an empty body).
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Result<Self> {
        let db = setup_test_db().await?;
        let config = Arc::new(config);
        let router = create_app(AppState {
            config: Arc::clone(&config),
            db: db.clone(),
        });
        Ok(Self { db, config, router })
    }

    /// Mints a session token for `user_id` valid for one hour.
    pub fn token_for(&self, user_id: Uuid) -> Result<String> {
        Ok(encode_session_token(
            self.config.session_secret_bytes(),
            user_id,
            chrono::Duration::hours(1),
        )?)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse {
            status,
            content_type,
            body,
        })
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
