//! # Studio Messages Handlers
//!
//! Mailbox endpoints for the acting studio. Every route runs the studio guard
//! through [`StudioContext`], and per-message access is checked before any
//! write.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::StudioContext;
use crate::error::{ApiError, not_found};
use crate::handlers::types::{ApiJson, ApiPath, ApiQuery, SuccessResponse, ValidatedJson, not_blank};
use crate::models::message::{Message, NewMessage, Party};
use crate::repositories::{MessageFilter, MessageFlags, MessageRepository, MessageSummary, ProfileRepository};
use crate::server::AppState;
use crate::telemetry::counters;

/// Query parameters for listing messages
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMessagesParams {
    /// `true` for the outbox, `false` (default) for the inbox
    pub sent: Option<bool>,
    /// Only archived (`true`) or only unarchived (`false`) messages
    pub archived: Option<bool>,
}

/// Response for listing messages
#[derive(Debug, Serialize, ToSchema)]
pub struct MessagesResponse {
    pub messages: Vec<MessageSummary>,
}

/// Request payload for sending a message to a talent
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    /// Recipient talent profile id
    pub talent_id: Uuid,
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    #[schema(example = "Callback for Friday")]
    pub subject: String,
    #[validate(length(min = 1, max = 10000), custom = "not_blank")]
    pub content: String,
    pub related_to_project_id: Option<Uuid>,
    pub related_to_casting_call_id: Option<Uuid>,
}

/// Partial update of a message's flags
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMessageRequest {
    pub is_read: Option<bool>,
    pub is_archived: Option<bool>,
}

impl From<UpdateMessageRequest> for MessageFlags {
    fn from(request: UpdateMessageRequest) -> Self {
        MessageFlags {
            is_read: request.is_read,
            is_archived: request.is_archived,
        }
    }
}

/// List the studio's inbox or outbox
#[utoipa::path(
    get,
    path = "/api/studio/messages",
    params(ListMessagesParams),
    responses(
        (status = 200, description = "Messages, newest first", body = MessagesResponse),
        (status = 400, description = "Invalid query parameters", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Not a studio account", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiQuery(params): ApiQuery<ListMessagesParams>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let filter = MessageFilter {
        sent: params.sent.unwrap_or(false),
        archived: params.archived,
    };
    debug!(studio_id = %ctx.studio_id(), ?filter, "Listing messages");

    let messages = MessageRepository::new(&state.db)
        .list_for_studio(&ctx.studio, filter)
        .await?;

    Ok(Json(MessagesResponse { messages }))
}

/// Send a message from the studio to a talent
#[utoipa::path(
    post,
    path = "/api/studio/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Casting call belongs to another studio", body = ApiError),
        (status = 404, description = "Talent or casting call not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<AppState>,
    ctx: StudioContext,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    if let Some(casting_call_id) = request.related_to_casting_call_id {
        ctx.load_casting_call(&state.db, casting_call_id).await?;
    }

    ProfileRepository::new(&state.db)
        .find_by_id(request.talent_id)
        .await?
        .ok_or_else(|| not_found("Talent profile"))?;

    let message = MessageRepository::new(&state.db)
        .create(NewMessage {
            sender: Party::Studio {
                id: ctx.studio_id(),
            },
            receiver: Party::Talent {
                id: request.talent_id,
            },
            subject: request.subject,
            content: request.content,
            related_to_project_id: request.related_to_project_id,
            related_to_casting_call_id: request.related_to_casting_call_id,
        })
        .await?;

    metrics::counter!(counters::MESSAGES_SENT).increment(1);
    info!(
        studio_id = %ctx.studio_id(),
        message_id = %message.id,
        talent_id = %message.receiver.id(),
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(message)))
}

/// Fetch one message, marking it read if it is unread and inbound
#[utoipa::path(
    get,
    path = "/api/studio/messages/{id}",
    params(("id" = Uuid, Path, description = "Message id")),
    responses(
        (status = 200, description = "The message", body = Message),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Message belongs to another studio", body = ApiError),
        (status = 404, description = "Message not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "messages"
)]
pub async fn get_message(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, ApiError> {
    let mut message = ctx.load_message(&state.db, id).await?;

    if message.is_inbound_to(ctx.studio_id()) && !message.is_read {
        MessageRepository::new(&state.db).mark_read(id).await?;
        message.is_read = true;
        debug!(message_id = %id, "Marked message read");
    }

    Ok(Json(message))
}

/// Flip the read/archived flags of a message
#[utoipa::path(
    patch,
    path = "/api/studio/messages/{id}",
    params(("id" = Uuid, Path, description = "Message id")),
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Updated message", body = Message),
        (status = 400, description = "Unknown field or wrong type", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Message belongs to another studio", body = ApiError),
        (status = 404, description = "Message not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "messages"
)]
pub async fn update_message(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let current = ctx.load_message(&state.db, id).await?;

    let flags = MessageFlags::from(request);
    if flags.is_empty() {
        return Ok(Json(current));
    }

    let updated = MessageRepository::new(&state.db)
        .update_flags(id, flags)
        .await?;

    Ok(Json(updated))
}

/// Permanently delete a message
#[utoipa::path(
    delete,
    path = "/api/studio/messages/{id}",
    params(("id" = Uuid, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Message belongs to another studio", body = ApiError),
        (status = 404, description = "Message not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "messages"
)]
pub async fn delete_message(
    State(state): State<AppState>,
    ctx: StudioContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    ctx.load_message(&state.db, id).await?;

    if !MessageRepository::new(&state.db).delete(id).await? {
        return Err(not_found("Message"));
    }

    info!(studio_id = %ctx.studio_id(), message_id = %id, "Message deleted");
    Ok(Json(SuccessResponse::ok()))
}
