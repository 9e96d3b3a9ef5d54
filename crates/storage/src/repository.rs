use async_trait::async_trait;
use dilmer_core::model::{
    Account, AccountId, Chapter, Credentials, GradeSheetRow, GradeSubmission, NameKey,
    StudentGrade, WrongQuestions,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflict")]
    Conflict,

    /// Any other integrity constraint (e.g. a dangling foreign key).
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a new account row.
#[derive(Debug, Clone)]
pub struct NewAccountRecord {
    pub name_key: NameKey,
    pub password: String,
}

impl NewAccountRecord {
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            name_key: credentials.name().clone(),
            password: credentials.password().to_owned(),
        }
    }
}

/// Repository contract for student accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the normalized name is taken.
    /// The check is the store's uniqueness constraint, never a prior read.
    async fn insert_account(&self, account: NewAccountRecord) -> Result<AccountId, StorageError>;

    /// Find the account whose name and password both match exactly.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup itself fails.
    async fn find_by_credentials(
        &self,
        name_key: &NameKey,
        password: &str,
    ) -> Result<Option<Account>, StorageError>;
}

/// Repository contract for the grade ledger.
#[async_trait]
pub trait GradeRepository: Send + Sync {
    /// Insert the grade, or replace the stored one for the same
    /// (student, chapter) pair, as a single atomic write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Constraint` if the student does not exist, or
    /// other storage errors.
    async fn upsert_grade(&self, grade: &GradeSubmission) -> Result<(), StorageError>;

    /// Grades of one student ordered by chapter ascending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures. Unknown students yield an
    /// empty list.
    async fn grades_for_student(
        &self,
        student_id: AccountId,
    ) -> Result<Vec<StudentGrade>, StorageError>;

    /// Every grade joined with its owner's name, ordered by name then chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn grade_sheet(&self) -> Result<Vec<GradeSheetRow>, StorageError>;
}

#[derive(Debug, Clone)]
struct StoredAccount {
    name_key: NameKey,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredGrade {
    correct: i32,
    wrong: i32,
    wrong_questions: Option<WrongQuestions>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_account_id: u64,
    accounts: HashMap<AccountId, StoredAccount>,
    names: HashMap<NameKey, AccountId>,
    grades: BTreeMap<(AccountId, Chapter), StoredGrade>,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Mirrors the SQL constraints: unique names, grades must reference an
/// existing account, and one grade per (student, chapter).
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn insert_account(&self, account: NewAccountRecord) -> Result<AccountId, StorageError> {
        let mut guard = self.state.lock().map_err(poisoned)?;
        if guard.names.contains_key(&account.name_key) {
            return Err(StorageError::Conflict);
        }
        guard.next_account_id += 1;
        let id = AccountId::new(guard.next_account_id);
        guard.names.insert(account.name_key.clone(), id);
        guard.accounts.insert(
            id,
            StoredAccount {
                name_key: account.name_key,
                password: account.password,
            },
        );
        Ok(id)
    }

    async fn find_by_credentials(
        &self,
        name_key: &NameKey,
        password: &str,
    ) -> Result<Option<Account>, StorageError> {
        let guard = self.state.lock().map_err(poisoned)?;
        let found = guard.names.get(name_key).and_then(|id| {
            guard
                .accounts
                .get(id)
                .filter(|stored| stored.password == password)
                .map(|stored| Account::new(*id, stored.name_key.clone()))
        });
        Ok(found)
    }
}

#[async_trait]
impl GradeRepository for InMemoryRepository {
    async fn upsert_grade(&self, grade: &GradeSubmission) -> Result<(), StorageError> {
        let mut guard = self.state.lock().map_err(poisoned)?;
        if !guard.accounts.contains_key(&grade.student_id) {
            return Err(StorageError::Constraint(format!(
                "student {} does not exist",
                grade.student_id
            )));
        }
        guard.grades.insert(
            (grade.student_id, grade.chapter),
            StoredGrade {
                correct: grade.correct,
                wrong: grade.wrong,
                wrong_questions: grade.wrong_questions.clone(),
            },
        );
        Ok(())
    }

    async fn grades_for_student(
        &self,
        student_id: AccountId,
    ) -> Result<Vec<StudentGrade>, StorageError> {
        let guard = self.state.lock().map_err(poisoned)?;
        // BTreeMap keys sort by (student, chapter), so the range is chapter-ordered.
        let grades = guard
            .grades
            .range((student_id, Chapter::MIN)..=(student_id, Chapter::MAX))
            .map(|((_, chapter), stored)| StudentGrade {
                chapter: *chapter,
                correct: stored.correct,
                wrong: stored.wrong,
            })
            .collect();
        Ok(grades)
    }

    async fn grade_sheet(&self) -> Result<Vec<GradeSheetRow>, StorageError> {
        let guard = self.state.lock().map_err(poisoned)?;
        let mut rows = Vec::with_capacity(guard.grades.len());
        for ((student_id, chapter), stored) in &guard.grades {
            let owner = guard
                .accounts
                .get(student_id)
                .ok_or(StorageError::NotFound)?;
            rows.push(GradeSheetRow {
                student_name: owner.name_key.clone(),
                chapter: *chapter,
                correct: stored.correct,
                wrong: stored.wrong,
                wrong_questions: stored.wrong_questions.clone(),
            });
        }
        rows.sort_by(|a, b| {
            a.student_name
                .as_str()
                .cmp(b.student_name.as_str())
                .then(a.chapter.cmp(&b.chapter))
        });
        Ok(rows)
    }
}

/// Aggregates account and grade repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub accounts: Arc<dyn AccountRepository>,
    pub grades: Arc<dyn GradeRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo.clone());
        let grades: Arc<dyn GradeRepository> = Arc::new(repo);
        Self { accounts, grades }
    }
}
