use dilmer_core::model::{Account, AccountId, NameKey};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{account_id_from_i64, classify, name_key_from_db, ser};
use crate::repository::{AccountRepository, NewAccountRecord, StorageError};

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn insert_account(&self, account: NewAccountRecord) -> Result<AccountId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO accounts (name_key, password)
            VALUES (?1, ?2)
            ",
        )
        .bind(account.name_key.into_inner())
        .bind(account.password)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        account_id_from_i64(res.last_insert_rowid())
    }

    async fn find_by_credentials(
        &self,
        name_key: &NameKey,
        password: &str,
    ) -> Result<Option<Account>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name_key
            FROM accounts
            WHERE name_key = ?1 AND password = ?2
            ",
        )
        .bind(name_key.as_str())
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id = account_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
        let name = name_key_from_db(row.try_get::<String, _>("name_key").map_err(ser)?);
        Ok(Some(Account::new(id, name)))
    }
}
