#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod error;
pub mod grade_service;

pub use account_service::AccountService;
pub use app_services::AppServices;
pub use error::{AccountServiceError, AppServicesError, GradeServiceError};
pub use grade_service::GradeService;
