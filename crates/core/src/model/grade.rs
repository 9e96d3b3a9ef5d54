use serde::{Deserialize, Serialize};

use crate::model::account::NameKey;
use crate::model::ids::AccountId;

/// Course section number a grade belongs to.
pub type Chapter = i32;

/// Opaque encoding of which questions a student missed.
///
/// The client owns the format; the ledger stores and returns it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrongQuestions(String);

impl WrongQuestions {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A quiz result for one (student, chapter) pair.
///
/// Submitting the same pair again replaces the stored counts and
/// wrong-question text; it never accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeSubmission {
    pub student_id: AccountId,
    pub chapter: Chapter,
    pub correct: i32,
    pub wrong: i32,
    pub wrong_questions: Option<WrongQuestions>,
}

/// Row of a student's own grade listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGrade {
    pub chapter: Chapter,
    pub correct: i32,
    pub wrong: i32,
}

/// Row of the teacher dashboard: one grade joined with its owner's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeSheetRow {
    pub student_name: NameKey,
    pub chapter: Chapter,
    pub correct: i32,
    pub wrong: i32,
    pub wrong_questions: Option<WrongQuestions>,
}
