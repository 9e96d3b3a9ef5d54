//! Grade submission, student listing and the teacher dashboard.

use crate::error::{ApiError, ApiResult, GRADE_NOT_SAVED, GRADES_UNAVAILABLE};
use crate::handlers::lenient;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use dilmer_core::model::{
    AccountId, Chapter, GradeSheetRow, GradeSubmission, NameKey, StudentGrade, WrongQuestions,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Grade submission request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGradeRequest {
    #[serde(deserialize_with = "lenient::number")]
    pub student_id: AccountId,
    #[serde(deserialize_with = "lenient::number")]
    pub chapter: Chapter,
    #[serde(deserialize_with = "lenient::number")]
    pub correct: i32,
    #[serde(deserialize_with = "lenient::number")]
    pub wrong: i32,
    /// Stored as text: strings verbatim, any other JSON value as its compact
    /// JSON form. An array is kept as `[4,7]`, not as a Postgres array
    /// literal such as `{4,7}`.
    #[serde(default)]
    pub wrong_questions: Option<Value>,
}

impl SubmitGradeRequest {
    fn into_submission(self) -> GradeSubmission {
        let wrong_questions = match self.wrong_questions {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(WrongQuestions::new(text)),
            Some(other) => Some(WrongQuestions::new(other.to_string())),
        };
        GradeSubmission {
            student_id: self.student_id,
            chapter: self.chapter,
            correct: self.correct,
            wrong: self.wrong,
            wrong_questions,
        }
    }
}

/// Plain success acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Teacher dashboard row, keyed the way the dashboard frontend reads it.
#[derive(Debug, Serialize)]
pub struct GradeSheetEntry {
    #[serde(rename = "ad_soyad")]
    pub student_name: NameKey,
    #[serde(rename = "bolum")]
    pub chapter: Chapter,
    #[serde(rename = "dogru")]
    pub correct: i32,
    #[serde(rename = "yanlis")]
    pub wrong: i32,
    #[serde(rename = "yanlis_sorular")]
    pub wrong_questions: Option<WrongQuestions>,
}

impl From<GradeSheetRow> for GradeSheetEntry {
    fn from(row: GradeSheetRow) -> Self {
        Self {
            student_name: row.student_name,
            chapter: row.chapter,
            correct: row.correct,
            wrong: row.wrong,
            wrong_questions: row.wrong_questions,
        }
    }
}

/// POST /api/grades
///
/// Every failure, an unreadable body included, is reported as a grade that
/// could not be saved.
pub async fn submit_grade(
    State(state): State<AppState>,
    body: Result<Json<SubmitGradeRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = body.map_err(|rejection| ApiError::store(GRADE_NOT_SAVED, rejection))?;
    state
        .grades()
        .submit_grade(&req.into_submission())
        .await
        .map_err(|e| ApiError::store(GRADE_NOT_SAVED, e))?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/grades/{student_id}
///
/// A non-integer id fails the same way a store-side type error would. Any
/// integer is a valid lookup; one that names no account yields no grades.
pub async fn student_grades(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<Vec<StudentGrade>>> {
    let raw_id: i64 = student_id.parse().map_err(|e| {
        ApiError::store(GRADES_UNAVAILABLE, format!("student id {student_id:?}: {e}"))
    })?;
    // Account ids are never negative.
    let Ok(id) = u64::try_from(raw_id) else {
        return Ok(Json(Vec::new()));
    };
    let grades = state
        .grades()
        .grades_for_student(AccountId::new(id))
        .await
        .map_err(|e| ApiError::store(GRADES_UNAVAILABLE, e))?;
    Ok(Json(grades))
}

/// GET /api/teacher/all-grades
pub async fn all_grades(State(state): State<AppState>) -> ApiResult<Json<Vec<GradeSheetEntry>>> {
    let rows = state
        .grades()
        .all_grades()
        .await
        .map_err(|e| ApiError::store_verbatim(e, state.config.redact_store_errors))?;
    Ok(Json(rows.into_iter().map(GradeSheetEntry::from).collect()))
}
