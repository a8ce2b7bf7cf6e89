//! # Authentication and Authorization
//!
//! Session verification and the studio capability check shared by every
//! `/api/studio` route.
//!
//! Sessions are HS256 JWTs minted by the external session provider. They are
//! read from `Authorization: Bearer <token>` or, failing that, from the
//! session cookie. [`StudioContext`] then resolves the session's user to its
//! tenant and studio with [`require_studio`].

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, forbidden, not_found, unauthorized};
use crate::models::casting_call::Model as CastingCallModel;
use crate::models::message::Message;
use crate::models::studio::Model as StudioModel;
use crate::models::tenant::{Model as TenantModel, TenantKind};
use crate::models::user::Model as UserModel;
use crate::repositories::{CastingCallRepository, MessageRepository, StudioRepository, TenantRepository};
use crate::server::AppState;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: Uuid,
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
}

/// An authenticated session, not yet tied to any tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: Uuid,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

/// Mint a session token. The service itself only verifies tokens; this exists
/// for tooling and tests that stand in for the session provider.
pub fn encode_session_token(
    secret: &[u8],
    user_id: Uuid,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionClaims {
        sub: user_id,
        exp: (chrono::Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

/// Verify a session token and return its claims.
pub fn decode_session_token(secret: &[u8], token: &str) -> Result<SessionClaims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                unauthorized(Some("Session has expired"))
            }
            _ => {
                tracing::debug!(error = %err, "Rejected session token");
                unauthorized(Some("Invalid session"))
            }
        })
}

fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, ApiError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let header = value
            .to_str()
            .map_err(|_| unauthorized(Some("Invalid Authorization header")))?;
        return header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")));
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized(None))
}

impl<S> FromRequestParts<S> for SessionUser
where
    Arc<AppConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AppConfig>::from_ref(state);
        let token = extract_session_token(&parts.headers, &config.session_cookie_name)?;
        let claims = decode_session_token(config.session_secret_bytes(), &token)?;
        Ok(SessionUser {
            user_id: claims.sub,
        })
    }
}

/// The acting studio together with the user and tenant it was resolved from
#[derive(Debug, Clone)]
pub struct StudioContext {
    pub user: UserModel,
    pub tenant: TenantModel,
    pub studio: StudioModel,
}

/// Resolve `user_id` to a studio the user may act for.
///
/// Lookups run in sequence with no caching. A missing user is a 401, a tenant
/// of any kind other than `STUDIO` is a 403, and a studio tenant without a
/// studio row gets one created on the spot.
pub async fn require_studio(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<StudioContext, ApiError> {
    let accounts = TenantRepository::new(db);

    let user = accounts
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| unauthorized(Some("Session does not match an account")))?;

    let tenant = accounts
        .get_tenant_by_id(user.tenant_id)
        .await?
        .ok_or_else(|| unauthorized(Some("Session does not match an account")))?;

    if tenant.kind != TenantKind::Studio {
        tracing::info!(user_id = %user.id, tenant_id = %tenant.id, kind = ?tenant.kind, "Non-studio tenant rejected");
        return Err(forbidden(Some("Studio account required")));
    }

    let studio = StudioRepository::new(db)
        .get_or_create_for_tenant(&tenant)
        .await?;

    Ok(StudioContext {
        user,
        tenant,
        studio,
    })
}

impl StudioContext {
    pub fn studio_id(&self) -> Uuid {
        self.studio.id
    }

    /// 403 unless the studio is the message's sender or receiver
    pub fn authorize_message(&self, message: &Message) -> Result<(), ApiError> {
        if message.involves_studio(self.studio.id) {
            Ok(())
        } else {
            tracing::warn!(studio_id = %self.studio.id, message_id = %message.id, "Studio denied access to message");
            Err(forbidden(Some("You do not have access to this message")))
        }
    }

    /// 403 unless the casting call belongs to the studio
    pub fn authorize_casting_call(&self, casting_call: &CastingCallModel) -> Result<(), ApiError> {
        if casting_call.studio_id == self.studio.id {
            Ok(())
        } else {
            tracing::warn!(studio_id = %self.studio.id, casting_call_id = %casting_call.id, "Studio denied access to casting call");
            Err(forbidden(Some("You do not have access to this casting call")))
        }
    }

    /// Load a message the studio may see: 404 if absent, then 403 if foreign.
    pub async fn load_message(
        &self,
        db: &DatabaseConnection,
        message_id: Uuid,
    ) -> Result<Message, ApiError> {
        let message = MessageRepository::new(db)
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| not_found("Message"))?;
        self.authorize_message(&message)?;
        Ok(message)
    }

    /// Load a casting call the studio owns: 404 if absent, then 403 if foreign.
    pub async fn load_casting_call(
        &self,
        db: &DatabaseConnection,
        casting_call_id: Uuid,
    ) -> Result<CastingCallModel, ApiError> {
        let casting_call = CastingCallRepository::new(db)
            .find_by_id(casting_call_id)
            .await?
            .ok_or_else(|| not_found("Casting call"))?;
        self.authorize_casting_call(&casting_call)?;
        Ok(casting_call)
    }
}

impl<S> FromRequestParts<S> for StudioContext
where
    Arc<AppConfig>: FromRef<S>,
    DatabaseConnection: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionUser::from_request_parts(parts, state).await?;
        let db = DatabaseConnection::from_ref(state);
        require_studio(&db, session.user_id).await
    }
}
