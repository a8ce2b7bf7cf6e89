//! # Repository Layer
//!
//! Repository implementations that encapsulate SeaORM operations for the
//! casting entities. Ownership checks live in the callers.

pub mod application;
pub mod casting_call;
pub mod invitation;
pub mod message;
pub mod profile;
pub mod studio;
pub mod tenant;

pub use application::ApplicationRepository;
pub use casting_call::{CastingCallChanges, CastingCallRepository, NewCastingCall};
pub use invitation::{InvitationRepository, InvitationView};
pub use message::{MessageFilter, MessageFlags, MessageRepository, MessageSummary};
pub use profile::{CreateProfileRequest, ProfileRepository};
pub use studio::StudioRepository;
pub use tenant::{CreateTenantRequest, CreateUserRequest, TenantRepository};
