use std::sync::Arc;

use dilmer_core::model::{AccountId, GradeSheetRow, GradeSubmission, StudentGrade};
use storage::repository::GradeRepository;

use crate::error::GradeServiceError;

/// Records quiz results and serves the student and teacher views.
#[derive(Clone)]
pub struct GradeService {
    grades: Arc<dyn GradeRepository>,
}

impl GradeService {
    #[must_use]
    pub fn new(grades: Arc<dyn GradeRepository>) -> Self {
        Self { grades }
    }

    /// Store the result for a (student, chapter) pair, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `GradeServiceError::Storage` if persistence fails.
    pub async fn submit_grade(&self, grade: &GradeSubmission) -> Result<(), GradeServiceError> {
        self.grades.upsert_grade(grade).await?;
        tracing::debug!(
            student_id = %grade.student_id,
            chapter = grade.chapter,
            correct = grade.correct,
            wrong = grade.wrong,
            "grade recorded"
        );
        Ok(())
    }

    /// A student's grades, ordered by chapter.
    ///
    /// # Errors
    ///
    /// Returns `GradeServiceError::Storage` if repository access fails.
    pub async fn grades_for_student(
        &self,
        student_id: AccountId,
    ) -> Result<Vec<StudentGrade>, GradeServiceError> {
        Ok(self.grades.grades_for_student(student_id).await?)
    }

    /// Every grade with its student's name, ordered by name then chapter.
    ///
    /// # Errors
    ///
    /// Returns `GradeServiceError::Storage` if repository access fails.
    pub async fn all_grades(&self) -> Result<Vec<GradeSheetRow>, GradeServiceError> {
        Ok(self.grades.grade_sheet().await?)
    }
}
