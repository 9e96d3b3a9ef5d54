//! HTTP request handlers.

pub mod accounts;
pub mod grades;
mod lenient;

pub use accounts::{login, signup};
pub use grades::{all_grades, student_grades, submit_grade};
