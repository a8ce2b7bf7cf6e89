//! # Casting Call Invitations Handlers
//!
//! A studio invites talent to a casting call by sending each of them an
//! invitation message. The batch is all-or-nothing.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::StudioContext;
use crate::error::{ApiError, RepositoryError, validation_error};
use crate::handlers::types::{ApiPath, ValidatedJson};
use crate::repositories::invitation::{build_invitations, dedupe_talent_ids};
use crate::repositories::{InvitationRepository, InvitationView};
use crate::server::AppState;
use crate::telemetry::counters;

/// Request payload for inviting talent to a casting call
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendInvitationsRequest {
    /// Talent profile ids; duplicates are collapsed
    #[validate(length(min = 1, message = "at least one talent id is required"))]
    pub talent_ids: Vec<Uuid>,
    /// Personal note; a default invitation text is used when absent
    #[validate(length(max = 10000))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationsSentResponse {
    pub success: bool,
    pub invitations_sent: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvitationsResponse {
    pub invitations: Vec<InvitationView>,
}

/// Invite talent to a casting call
#[utoipa::path(
    post,
    path = "/api/studio/casting-calls/{id}/invitations",
    params(("id" = Uuid, Path, description = "Casting call id")),
    request_body = SendInvitationsRequest,
    responses(
        (status = 201, description = "Invitations sent", body = InvitationsSentResponse),
        (status = 400, description = "Validation failed or unknown talent id", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "invitations"
)]
pub async fn send_invitations(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<SendInvitationsRequest>,
) -> Result<(StatusCode, Json<InvitationsSentResponse>), ApiError> {
    let casting_call = ctx.load_casting_call(&state.db, id).await?;

    let talent_ids = dedupe_talent_ids(request.talent_ids);
    let limit = state.config.max_invitations_per_request;
    if talent_ids.len() > limit {
        return Err(validation_error(
            "Too many talent ids",
            serde_json::json!({ "talent_ids": [format!("at most {limit} distinct talent ids are allowed")] }),
        ));
    }

    let invitations = build_invitations(
        ctx.studio_id(),
        &casting_call,
        &talent_ids,
        request.message.as_deref(),
    );

    let sent = match InvitationRepository::new(&state.db)
        .send_batch(invitations)
        .await
    {
        Ok(sent) => sent,
        Err(RepositoryError::InvalidReference(detail)) => {
            metrics::counter!(counters::INVITATION_BATCH_FAILURES).increment(1);
            warn!(casting_call_id = %id, %detail, "Invitation batch rejected: unknown talent id");
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "INVALID_TALENT_ID",
                "One or more talent ids do not exist",
            )
            .with_details(serde_json::json!({
                "talent_ids": ["one or more ids do not match a talent profile"]
            })));
        }
        Err(err) => {
            metrics::counter!(counters::INVITATION_BATCH_FAILURES).increment(1);
            return Err(err.into());
        }
    };

    metrics::counter!(counters::INVITATIONS_SENT).increment(sent as u64);
    info!(
        studio_id = %ctx.studio_id(),
        casting_call_id = %id,
        sent,
        "Invitations sent"
    );

    Ok((
        StatusCode::CREATED,
        Json(InvitationsSentResponse {
            success: true,
            invitations_sent: sent,
        }),
    ))
}

/// Invitations sent for a casting call and whether each talent has applied
#[utoipa::path(
    get,
    path = "/api/studio/casting-calls/{id}/invitations",
    params(("id" = Uuid, Path, description = "Casting call id")),
    responses(
        (status = 200, description = "Invitations, newest first", body = InvitationsResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Casting call not found", body = ApiError)
    ),
    tag = "invitations"
)]
pub async fn list_invitations(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<InvitationsResponse>, ApiError> {
    ctx.load_casting_call(&state.db, id).await?;

    let invitations = InvitationRepository::new(&state.db)
        .list_for_casting_call(ctx.studio_id(), id)
        .await?;

    Ok(Json(InvitationsResponse { invitations }))
}
