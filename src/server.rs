//! # Server Configuration
//!
//! Router assembly, OpenAPI registration and the listener loop for the
//! Casting API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers::{self, applications, casting_calls, invitations, messages};
use crate::telemetry::trace_id_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
}

/// Studio API routes, all guarded by the studio session extractor
fn studio_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .patch(messages::update_message)
                .delete(messages::delete_message),
        )
        .route(
            "/casting-calls",
            get(casting_calls::list_casting_calls).post(casting_calls::create_casting_call),
        )
        .route(
            "/casting-calls/{id}",
            get(casting_calls::get_casting_call)
                .patch(casting_calls::update_casting_call)
                .delete(casting_calls::delete_casting_call),
        )
        .route(
            "/casting-calls/{id}/applications",
            get(applications::list_applications),
        )
        .route(
            "/casting-calls/{id}/applications/{application_id}",
            patch(applications::update_application_status),
        )
        .route(
            "/casting-calls/{id}/invitations",
            get(invitations::list_invitations).post(invitations::send_invitations),
        )
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .nest("/api/studio", studio_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id_middleware))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState {
        config: Arc::new(config),
        db,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::messages::list_messages,
        crate::handlers::messages::send_message,
        crate::handlers::messages::get_message,
        crate::handlers::messages::update_message,
        crate::handlers::messages::delete_message,
        crate::handlers::casting_calls::list_casting_calls,
        crate::handlers::casting_calls::create_casting_call,
        crate::handlers::casting_calls::get_casting_call,
        crate::handlers::casting_calls::update_casting_call,
        crate::handlers::casting_calls::delete_casting_call,
        crate::handlers::applications::list_applications,
        crate::handlers::applications::update_application_status,
        crate::handlers::invitations::send_invitations,
        crate::handlers::invitations::list_invitations,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthResponse,
            crate::error::ApiError,
            crate::handlers::types::SuccessResponse,
            crate::models::message::Party,
            crate::models::message::Message,
            crate::repositories::MessageSummary,
            crate::handlers::messages::MessagesResponse,
            crate::handlers::messages::SendMessageRequest,
            crate::handlers::messages::UpdateMessageRequest,
            crate::models::casting_call::CastingCallStatus,
            crate::handlers::casting_calls::CastingCallView,
            crate::handlers::casting_calls::CastingCallsResponse,
            crate::handlers::casting_calls::CreateCastingCallRequest,
            crate::handlers::casting_calls::UpdateCastingCallRequest,
            crate::models::application::ApplicationStatus,
            crate::handlers::applications::ApplicantView,
            crate::handlers::applications::ApplicationView,
            crate::handlers::applications::ApplicationsResponse,
            crate::handlers::applications::UpdateApplicationStatusRequest,
            crate::repositories::InvitationView,
            crate::handlers::invitations::SendInvitationsRequest,
            crate::handlers::invitations::InvitationsSentResponse,
            crate::handlers::invitations::InvitationsResponse,
        )
    ),
    tags(
        (name = "root", description = "Service probes"),
        (name = "messages", description = "Studio mailbox"),
        (name = "casting-calls", description = "Studio casting calls"),
        (name = "applications", description = "Applications to casting calls"),
        (name = "invitations", description = "Casting call invitations"),
    ),
    info(
        title = "Casting API",
        description = "Studio messaging, casting calls and invitations",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
