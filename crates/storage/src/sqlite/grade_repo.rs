use dilmer_core::model::{AccountId, GradeSheetRow, GradeSubmission, StudentGrade};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{account_id_to_i64, classify, name_key_from_db, ser, wrong_questions_from_db};
use crate::repository::{GradeRepository, StorageError};

#[async_trait::async_trait]
impl GradeRepository for SqliteRepository {
    async fn upsert_grade(&self, grade: &GradeSubmission) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO grade_records (student_id, chapter, correct, wrong, wrong_questions)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(student_id, chapter) DO UPDATE SET
                correct = excluded.correct,
                wrong = excluded.wrong,
                wrong_questions = excluded.wrong_questions
            ",
        )
        .bind(account_id_to_i64(grade.student_id)?)
        .bind(grade.chapter)
        .bind(grade.correct)
        .bind(grade.wrong)
        .bind(grade.wrong_questions.as_ref().map(|w| w.as_str().to_owned()))
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn grades_for_student(
        &self,
        student_id: AccountId,
    ) -> Result<Vec<StudentGrade>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT chapter, correct, wrong
            FROM grade_records
            WHERE student_id = ?1
            ORDER BY chapter ASC
            ",
        )
        .bind(account_id_to_i64(student_id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let mut grades = Vec::with_capacity(rows.len());
        for row in rows {
            grades.push(StudentGrade {
                chapter: row.try_get("chapter").map_err(ser)?,
                correct: row.try_get("correct").map_err(ser)?,
                wrong: row.try_get("wrong").map_err(ser)?,
            });
        }
        Ok(grades)
    }

    async fn grade_sheet(&self) -> Result<Vec<GradeSheetRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT accounts.name_key, grade_records.chapter, grade_records.correct,
                   grade_records.wrong, grade_records.wrong_questions
            FROM grade_records
            JOIN accounts ON grade_records.student_id = accounts.id
            ORDER BY accounts.name_key, grade_records.chapter
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let mut sheet = Vec::with_capacity(rows.len());
        for row in rows {
            sheet.push(sheet_row(&row)?);
        }
        Ok(sheet)
    }
}

fn sheet_row(row: &SqliteRow) -> Result<GradeSheetRow, StorageError> {
    Ok(GradeSheetRow {
        student_name: name_key_from_db(row.try_get::<String, _>("name_key").map_err(ser)?),
        chapter: row.try_get("chapter").map_err(ser)?,
        correct: row.try_get("correct").map_err(ser)?,
        wrong: row.try_get("wrong").map_err(ser)?,
        wrong_questions: wrong_questions_from_db(
            row.try_get::<Option<String>, _>("wrong_questions")
                .map_err(ser)?,
        ),
    })
}
