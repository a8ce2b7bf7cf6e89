//! # Casting API Library
//!
//! Core of the casting marketplace studio service: studio messaging,
//! casting calls, applications and invitations behind a session-guarded
//! HTTP API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
