use std::sync::Arc;

use storage::repository::Storage;

use crate::account_service::AccountService;
use crate::error::AppServicesError;
use crate::grade_service::GradeService;

/// Assembles the request-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    accounts: Arc<AccountService>,
    grades: Arc<GradeService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage))
    }

    /// Build services over in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(&Storage::in_memory())
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(Arc::clone(&storage.accounts))),
            grades: Arc::new(GradeService::new(Arc::clone(&storage.grades))),
        }
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn grades(&self) -> Arc<GradeService> {
        Arc::clone(&self.grades)
    }
}
