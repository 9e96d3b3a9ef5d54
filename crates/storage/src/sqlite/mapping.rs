use dilmer_core::model::{AccountId, NameKey, WrongQuestions};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn account_id_from_i64(v: i64) -> Result<AccountId, StorageError> {
    u64::try_from(v)
        .map(AccountId::new)
        .map_err(|_| StorageError::Serialization("account_id sign overflow".into()))
}

pub(crate) fn account_id_to_i64(id: AccountId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("account_id overflow".into()))
}

pub(crate) fn name_key_from_db(value: String) -> NameKey {
    NameKey::from_persisted(value)
}

pub(crate) fn wrong_questions_from_db(value: Option<String>) -> Option<WrongQuestions> {
    value.map(WrongQuestions::new)
}

/// Classify a sqlx failure into the storage taxonomy.
///
/// Unique violations become `Conflict` so callers can turn a lost race into a
/// domain error; foreign-key failures become `Constraint`.
pub(crate) fn classify(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StorageError::Conflict;
        }
        if db_err.is_foreign_key_violation() {
            return StorageError::Constraint(db_err.message().to_owned());
        }
    }
    StorageError::Connection(err.to_string())
}
