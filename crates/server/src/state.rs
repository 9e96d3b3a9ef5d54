//! Shared handler state.

use services::{AccountService, AppServices, GradeService};
use std::sync::Arc;

/// Behavior switches for the HTTP layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiConfig {
    /// Replace raw store errors on the teacher dashboard with the generic message.
    pub redact_store_errors: bool,
}

/// Application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(services: AppServices, config: ApiConfig) -> Self {
        Self { services, config }
    }

    pub fn accounts(&self) -> Arc<AccountService> {
        self.services.accounts()
    }

    pub fn grades(&self) -> Arc<GradeService> {
        self.services.grades()
    }
}
