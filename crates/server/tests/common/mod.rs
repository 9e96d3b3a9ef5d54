//! Shared test utilities.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dilmer_core::model::{Account, AccountId, GradeSheetRow, GradeSubmission, NameKey, StudentGrade};
use dilmer_server::{ApiConfig, AppState, create_router};
use serde_json::Value;
use services::AppServices;
use std::sync::Arc;
use storage::repository::{
    AccountRepository, GradeRepository, NewAccountRecord, Storage, StorageError,
};
use tower::ServiceExt;

/// Router plus whatever keeps its backing store alive.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    _temp_dir: Option<tempfile::TempDir>,
}

#[allow(dead_code)]
impl TestServer {
    /// Server over in-memory repositories.
    pub fn new() -> Self {
        Self::with_storage(&Storage::in_memory(), ApiConfig::default())
    }

    /// Server over a fresh on-disk SQLite database.
    pub async fn sqlite() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let url = format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("api.sqlite3").display()
        );
        let storage = Storage::sqlite(&url).await.expect("Failed to open sqlite");
        let mut server = Self::with_storage(&storage, ApiConfig::default());
        server._temp_dir = Some(temp_dir);
        server
    }

    pub fn with_storage(storage: &Storage, config: ApiConfig) -> Self {
        let state = AppState::new(AppServices::from_storage(storage), config);
        Self {
            router: create_router(state),
            _temp_dir: None,
        }
    }

    /// Server whose store fails every call with the given message.
    pub fn broken(message: &str, config: ApiConfig) -> Self {
        let broken = Arc::new(BrokenStore(message.to_string()));
        let storage = Storage {
            accounts: broken.clone(),
            grades: broken,
        };
        Self::with_storage(&storage, config)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        json_request(&self.router, "GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        json_request(&self.router, "POST", uri, Some(body)).await
    }
}

/// Helper to make JSON requests.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

struct BrokenStore(String);

impl BrokenStore {
    fn fail<T>(&self) -> Result<T, StorageError> {
        Err(StorageError::Connection(self.0.clone()))
    }
}

#[async_trait]
impl AccountRepository for BrokenStore {
    async fn insert_account(&self, _account: NewAccountRecord) -> Result<AccountId, StorageError> {
        self.fail()
    }

    async fn find_by_credentials(
        &self,
        _name_key: &NameKey,
        _password: &str,
    ) -> Result<Option<Account>, StorageError> {
        self.fail()
    }
}

#[async_trait]
impl GradeRepository for BrokenStore {
    async fn upsert_grade(&self, _grade: &GradeSubmission) -> Result<(), StorageError> {
        self.fail()
    }

    async fn grades_for_student(
        &self,
        _student_id: AccountId,
    ) -> Result<Vec<StudentGrade>, StorageError> {
        self.fail()
    }

    async fn grade_sheet(&self) -> Result<Vec<GradeSheetRow>, StorageError> {
        self.fail()
    }
}
