mod account;
mod grade;
mod ids;

pub use account::{Account, Credentials, NameKey};
pub use grade::{Chapter, GradeSheetRow, GradeSubmission, StudentGrade, WrongQuestions};
pub use ids::{AccountId, ParseIdError};
