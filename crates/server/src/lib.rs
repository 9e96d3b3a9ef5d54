//! HTTP API for the DİLMER student-records backend.
//!
//! - Account signup and login
//! - Per-chapter grade submission (upsert)
//! - Student grade listing and the teacher dashboard

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServerArgs;
pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};
