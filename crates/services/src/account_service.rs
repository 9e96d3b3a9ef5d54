use std::sync::Arc;

use dilmer_core::model::{Account, AccountId, Credentials};
use storage::repository::{AccountRepository, NewAccountRecord, StorageError};

use crate::error::AccountServiceError;

/// Signup and login against the account store.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Register a new account under the lower-cased name.
    ///
    /// # Errors
    ///
    /// Returns `AccountServiceError::DuplicateAccount` when the store's unique
    /// constraint rejects the name.
    /// Returns `AccountServiceError::Storage` for any other persistence failure.
    pub async fn register(&self, credentials: &Credentials) -> Result<AccountId, AccountServiceError> {
        match self
            .accounts
            .insert_account(NewAccountRecord::from_credentials(credentials))
            .await
        {
            Ok(id) => {
                tracing::info!(account_id = %id, "registered account");
                Ok(id)
            }
            Err(StorageError::Conflict) => {
                tracing::debug!(name = %credentials.name(), "signup rejected: name taken");
                Err(AccountServiceError::DuplicateAccount)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Look up the account matching both the normalized name and the password.
    ///
    /// # Errors
    ///
    /// Returns `AccountServiceError::InvalidCredentials` when nothing matches,
    /// without saying which field was wrong.
    /// Returns `AccountServiceError::Storage` if the lookup fails.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Account, AccountServiceError> {
        self.accounts
            .find_by_credentials(credentials.name(), credentials.password())
            .await?
            .ok_or(AccountServiceError::InvalidCredentials)
    }
}
