//! # Studio Applications Handlers
//!
//! Studios read the applications on their casting calls and move them
//! through review statuses. Any status may follow any other.

use axum::{extract::State, response::Json};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::StudioContext;
use crate::error::{ApiError, not_found};
use crate::handlers::types::{ApiJson, ApiPath};
use crate::models::application::{ApplicationStatus, Model as ApplicationModel};
use crate::models::profile::Model as ProfileModel;
use crate::repositories::ApplicationRepository;
use crate::server::AppState;

/// Public fields of the applicant's profile
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantView {
    pub profile_id: Uuid,
    pub display_name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
}

impl From<ProfileModel> for ApplicantView {
    fn from(profile: ProfileModel) -> Self {
        Self {
            profile_id: profile.id,
            display_name: profile.display_name,
            headline: profile.headline,
            location: profile.location,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub casting_call_id: Uuid,
    pub profile_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_note: Option<String>,
    pub applicant: Option<ApplicantView>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl ApplicationView {
    fn new(application: ApplicationModel, profile: Option<ProfileModel>) -> Self {
        Self {
            id: application.id,
            casting_call_id: application.casting_call_id,
            profile_id: application.profile_id,
            status: application.status,
            cover_note: application.cover_note,
            applicant: profile.map(ApplicantView::from),
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationView>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}

/// Applications submitted to one of the studio's casting calls
#[utoipa::path(
    get,
    path = "/api/studio/casting-calls/{id}/applications",
    params(("id" = Uuid, Path, description = "Casting call id")),
    responses(
        (status = 200, description = "Applications, newest first", body = ApplicationsResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call not found", body = ApiError)
    ),
    tag = "applications"
)]
pub async fn list_applications(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    ctx.load_casting_call(&state.db, id).await?;

    let applications = ApplicationRepository::new(&state.db)
        .list_with_profiles(id)
        .await?
        .into_iter()
        .map(|(application, profile)| ApplicationView::new(application, profile))
        .collect();

    Ok(Json(ApplicationsResponse { applications }))
}

/// Set the review status of an application
#[utoipa::path(
    patch,
    path = "/api/studio/casting-calls/{id}/applications/{application_id}",
    params(
        ("id" = Uuid, Path, description = "Casting call id"),
        ("application_id" = Uuid, Path, description = "Application id")
    ),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Updated application", body = ApplicationView),
        (status = 400, description = "Invalid status", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call or application not found", body = ApiError)
    ),
    tag = "applications"
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath((casting_call_id, application_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<UpdateApplicationStatusRequest>,
) -> Result<Json<ApplicationView>, ApiError> {
    ctx.load_casting_call(&state.db, casting_call_id).await?;

    let repository = ApplicationRepository::new(&state.db);
    let application = repository
        .find_by_id(application_id)
        .await?
        .filter(|application| application.casting_call_id == casting_call_id)
        .ok_or_else(|| not_found("Application"))?;

    let previous = application.status;
    let updated = repository.update_status(application, request.status).await?;
    info!(
        application_id = %updated.id,
        from = ?previous,
        to = ?updated.status,
        "Application status changed"
    );

    Ok(Json(ApplicationView::new(updated, None)))
}
