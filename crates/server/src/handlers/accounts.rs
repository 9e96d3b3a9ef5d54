//! Signup and login endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use dilmer_core::model::{AccountId, Credentials, NameKey};
use serde::{Deserialize, Serialize};

/// Signup/login request body.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub name: String,
    pub password: String,
}

impl CredentialsRequest {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.name, self.password.as_str())
    }
}

/// Signup response.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub id: AccountId,
}

/// Login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub student_id: AccountId,
    pub name: NameKey,
}

/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<SignupResponse>> {
    let Json(req) = body?;
    let id = state.accounts().register(&req.credentials()).await?;
    Ok(Json(SignupResponse { success: true, id }))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = body?;
    let account = state
        .accounts()
        .authenticate(&req.credentials())
        .await
        .inspect_err(|err| {
            if matches!(err, services::AccountServiceError::InvalidCredentials) {
                tracing::info!(name = %NameKey::normalize(&req.name), "login rejected");
            }
        })
        .map_err(ApiError::from)?;

    Ok(Json(LoginResponse {
        success: true,
        student_id: account.id(),
        name: account.name().clone(),
    }))
}
