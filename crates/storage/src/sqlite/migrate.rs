use chrono::Utc;
use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};

use super::SqliteInitError;

async fn is_applied(conn: &mut SqliteConnection, version: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
        .bind(version)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

async fn mark_applied(tx: &mut Transaction<'_, Sqlite>, version: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(version)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Brings the schema up to date.
///
/// Version 1 is the initial two-table layout. Version 2 collapses duplicate
/// (student, chapter) grade rows and adds the unique index that makes grade
/// submission an upsert.
pub async fn run_migrations(conn: &mut SqliteConnection) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(&mut *conn)
    .await?;

    // Version 1: accounts + grade records.
    if !is_applied(conn, 1).await? {
        let mut tx = conn.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS accounts (
                    id INTEGER PRIMARY KEY,
                    name_key TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS grade_records (
                    id INTEGER PRIMARY KEY,
                    student_id INTEGER NOT NULL REFERENCES accounts(id),
                    chapter INTEGER NOT NULL,
                    correct INTEGER NOT NULL,
                    wrong INTEGER NOT NULL,
                    wrong_questions TEXT
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        mark_applied(&mut tx, 1).await?;
        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    // Version 2: one grade per (student, chapter).
    if !is_applied(conn, 2).await? {
        let mut tx = conn.begin().await?;

        let collapsed = sqlx::query(
            r"
                DELETE FROM grade_records
                WHERE id NOT IN (
                    SELECT MAX(id) FROM grade_records GROUP BY student_id, chapter
                );
            ",
        )
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_grade_records_student_chapter
                    ON grade_records (student_id, chapter);
            ",
        )
        .execute(&mut *tx)
        .await?;

        mark_applied(&mut tx, 2).await?;
        tx.commit().await?;

        if collapsed > 0 {
            tracing::warn!(
                collapsed,
                "removed duplicate grade rows before adding the (student, chapter) index"
            );
        }
        tracing::info!(version = 2, "applied schema migration");
    }

    Ok(())
}
