//! # Studio Casting Calls Handlers

use axum::{extract::State, http::StatusCode, response::Json};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::StudioContext;
use crate::error::{ApiError, not_found};
use crate::handlers::types::{ApiPath, ApiQuery, SuccessResponse, ValidatedJson, not_blank, nullable};
use crate::models::casting_call::{CastingCallStatus, Model as CastingCallModel};
use crate::repositories::{CastingCallChanges, CastingCallRepository, NewCastingCall};
use crate::server::AppState;

const MAX_SKILLS: usize = 50;
const MAX_SKILL_LEN: usize = 64;

/// Casting call as returned by the studio API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastingCallView {
    pub id: Uuid,
    pub studio_id: Uuid,
    pub project_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: CastingCallStatus,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub compensation: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub application_deadline: Option<DateTimeWithTimeZone>,
    /// Present on the detail view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_count: Option<u64>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl CastingCallView {
    pub fn new(model: CastingCallModel, application_count: Option<u64>) -> Self {
        let skills = model.skill_tags();
        Self {
            id: model.id,
            studio_id: model.studio_id,
            project_id: model.project_id,
            title: model.title,
            description: model.description,
            status: model.status,
            location: model.location,
            skills,
            compensation: model.compensation,
            application_deadline: model.application_deadline,
            application_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Response for listing casting calls
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastingCallsResponse {
    pub casting_calls: Vec<CastingCallView>,
}

/// Query parameters for listing casting calls
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCastingCallsParams {
    pub status: Option<CastingCallStatus>,
}

fn validate_skills(skills: &[String]) -> Result<(), ValidationError> {
    if skills.len() > MAX_SKILLS {
        let mut error = ValidationError::new("too_many_skills");
        error.message = Some(format!("at most {MAX_SKILLS} skills are allowed").into());
        return Err(error);
    }
    if skills.iter().any(|skill| {
        let len = skill.trim().chars().count();
        len == 0 || len > MAX_SKILL_LEN
    }) {
        let mut error = ValidationError::new("skill_length");
        error.message = Some(format!("each skill must be 1 to {MAX_SKILL_LEN} characters").into());
        return Err(error);
    }
    Ok(())
}

fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .collect()
}

/// Request payload for creating a casting call
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCastingCallRequest {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    #[schema(example = "Lead dancer for music video")]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub project_id: Option<Uuid>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_skills")]
    pub skills: Vec<String>,
    #[validate(length(max = 200))]
    pub compensation: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub application_deadline: Option<DateTimeWithTimeZone>,
}

/// Partial update of a casting call; `null` clears nullable fields
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCastingCallRequest {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 10000))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub status: Option<CastingCallStatus>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 200))]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[validate(custom = "validate_skills")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 200))]
    #[schema(value_type = Option<String>)]
    pub compensation: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub application_deadline: Option<Option<DateTimeWithTimeZone>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub project_id: Option<Option<Uuid>>,
}

impl From<UpdateCastingCallRequest> for CastingCallChanges {
    fn from(request: UpdateCastingCallRequest) -> Self {
        CastingCallChanges {
            title: request.title.map(|title| title.trim().to_string()),
            description: request.description,
            status: request.status,
            location: request.location,
            skills: request.skills.map(normalize_skills),
            compensation: request.compensation,
            application_deadline: request.application_deadline,
            project_id: request.project_id,
        }
    }
}

/// List the studio's casting calls
#[utoipa::path(
    get,
    path = "/api/studio/casting-calls",
    params(ListCastingCallsParams),
    responses(
        (status = 200, description = "Casting calls, newest first", body = CastingCallsResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Not a studio account", body = ApiError)
    ),
    tag = "casting-calls"
)]
pub async fn list_casting_calls(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiQuery(params): ApiQuery<ListCastingCallsParams>,
) -> Result<Json<CastingCallsResponse>, ApiError> {
    let casting_calls = CastingCallRepository::new(&state.db)
        .list_for_studio(ctx.studio_id(), params.status)
        .await?
        .into_iter()
        .map(|model| CastingCallView::new(model, None))
        .collect();

    Ok(Json(CastingCallsResponse { casting_calls }))
}

/// Create an `OPEN` casting call for the studio
#[utoipa::path(
    post,
    path = "/api/studio/casting-calls",
    request_body = CreateCastingCallRequest,
    responses(
        (status = 201, description = "Casting call created", body = CastingCallView),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Not a studio account", body = ApiError)
    ),
    tag = "casting-calls"
)]
pub async fn create_casting_call(
    State(state): State<AppState>,
    ctx: StudioContext,
    ValidatedJson(request): ValidatedJson<CreateCastingCallRequest>,
) -> Result<(StatusCode, Json<CastingCallView>), ApiError> {
    let created = CastingCallRepository::new(&state.db)
        .create(
            ctx.studio_id(),
            NewCastingCall {
                title: request.title.trim().to_string(),
                description: request.description,
                project_id: request.project_id,
                location: request.location,
                skills: normalize_skills(request.skills),
                compensation: request.compensation,
                application_deadline: request.application_deadline,
            },
        )
        .await?;

    info!(studio_id = %ctx.studio_id(), casting_call_id = %created.id, "Casting call created");
    Ok((StatusCode::CREATED, Json(CastingCallView::new(created, Some(0)))))
}

/// Casting call detail with its application count
#[utoipa::path(
    get,
    path = "/api/studio/casting-calls/{id}",
    params(("id" = Uuid, Path, description = "Casting call id")),
    responses(
        (status = 200, description = "Casting call detail", body = CastingCallView),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call not found", body = ApiError)
    ),
    tag = "casting-calls"
)]
pub async fn get_casting_call(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CastingCallView>, ApiError> {
    let casting_call = ctx.load_casting_call(&state.db, id).await?;
    let count = CastingCallRepository::new(&state.db)
        .count_applications(id)
        .await?;

    Ok(Json(CastingCallView::new(casting_call, Some(count))))
}

/// Partially update a casting call
#[utoipa::path(
    patch,
    path = "/api/studio/casting-calls/{id}",
    params(("id" = Uuid, Path, description = "Casting call id")),
    request_body = UpdateCastingCallRequest,
    responses(
        (status = 200, description = "Updated casting call", body = CastingCallView),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call not found", body = ApiError)
    ),
    tag = "casting-calls"
)]
pub async fn update_casting_call(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCastingCallRequest>,
) -> Result<Json<CastingCallView>, ApiError> {
    let existing = ctx.load_casting_call(&state.db, id).await?;

    let repository = CastingCallRepository::new(&state.db);
    let updated = repository.update(existing, request.into()).await?;
    let count = repository.count_applications(id).await?;

    Ok(Json(CastingCallView::new(updated, Some(count))))
}

/// Delete a casting call and its applications
#[utoipa::path(
    delete,
    path = "/api/studio/casting-calls/{id}",
    params(("id" = Uuid, Path, description = "Casting call id")),
    responses(
        (status = 200, description = "Casting call deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call not found", body = ApiError)
    ),
    tag = "casting-calls"
)]
pub async fn delete_casting_call(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    ctx.load_casting_call(&state.db, id).await?;

    if !CastingCallRepository::new(&state.db).delete(id).await? {
        return Err(not_found("Casting call"));
    }

    info!(studio_id = %ctx.studio_id(), casting_call_id = %id, "Casting call deleted");
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_are_bounded() {
        assert!(validate_skills(&["dance".to_string()]).is_ok());
        assert!(validate_skills(&[" ".to_string()]).is_err());
        assert!(validate_skills(&["x".repeat(MAX_SKILL_LEN + 1)]).is_err());
        assert!(validate_skills(&vec!["a".to_string(); MAX_SKILLS + 1]).is_err());
    }

    #[test]
    fn update_request_rejects_unknown_fields() {
        let result: Result<UpdateCastingCallRequest, _> =
            serde_json::from_str(r#"{"title":"x","studioId":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_request_validates_title() {
        let request: UpdateCastingCallRequest = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateCastingCallRequest =
            serde_json::from_str(r#"{"status":"FILLED","description":null}"#).unwrap();
        assert!(request.validate().is_ok());
        let changes = CastingCallChanges::from(request);
        assert_eq!(changes.status, Some(CastingCallStatus::Filled));
        assert_eq!(changes.description, Some(None));
    }

    #[test]
    fn update_request_trims_title() {
        let request: UpdateCastingCallRequest =
            serde_json::from_str(r#"{"title":"  Lead role "}"#).unwrap();
        assert!(request.validate().is_ok());
        let changes = CastingCallChanges::from(request);
        assert_eq!(changes.title.as_deref(), Some("Lead role"));
    }
}
