//! # Data Models
//!
//! SeaORM entities for the casting marketplace plus the small API-facing
//! types shared across handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod application;
pub mod casting_call;
pub mod message;
pub mod profile;
pub mod studio;
pub mod tenant;
pub mod user;

pub use application::Entity as Application;
pub use casting_call::Entity as CastingCall;
pub use message::Entity as MessageRow;
pub use profile::Entity as Profile;
pub use studio::Entity as Studio;
pub use tenant::Entity as Tenant;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "casting-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
