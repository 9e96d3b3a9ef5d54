#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    Account, AccountId, Chapter, Credentials, GradeSheetRow, GradeSubmission, NameKey,
    ParseIdError, StudentGrade, WrongQuestions,
};
