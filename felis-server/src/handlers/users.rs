use std::fmt;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use felis_core::{
    UserAccount,
    credentials::{LoginAttempt, RegistrationRequest},
};
use serde::Deserialize;

use crate::infra::{app_state::AppState, errors::AppResult};

/// Login fields, accepted either as query parameters or a JSON body.
/// Missing fields read as empty strings.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl From<LoginPayload> for LoginAttempt {
    fn from(payload: LoginPayload) -> Self {
        LoginAttempt::new(payload.username, payload.password)
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName", alias = "full_name")]
    pub full_name: String,
    pub password: String,
}

impl fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

impl From<RegisterPayload> for RegistrationRequest {
    fn from(payload: RegisterPayload) -> Self {
        RegistrationRequest::new(
            payload.username,
            payload.email,
            payload.full_name,
            payload.password,
        )
    }
}

async fn login(state: &AppState, payload: LoginPayload) -> AppResult<Json<UserAccount>> {
    Ok(Json(state.credentials.login(payload.into()).await?))
}

async fn register(
    state: &AppState,
    payload: RegisterPayload,
) -> AppResult<(StatusCode, Json<UserAccount>)> {
    let account = state.credentials.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Authenticate a user.
///
/// - `200 OK` with the account on success
/// - `400 Bad Request` when the username or password is blank
/// - `401 Unauthorized` for an unknown user or wrong password; both carry
///   the same message
pub async fn login_query_handler(
    State(state): State<AppState>,
    Query(payload): Query<LoginPayload>,
) -> AppResult<Json<UserAccount>> {
    login(&state, payload).await
}

pub async fn login_json_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<UserAccount>> {
    login(&state, payload).await
}

/// Create a user account.
///
/// - `201 Created` with the new account
/// - `400 Bad Request` when a field fails validation
/// - `409 Conflict` when the username or email is taken (username checked
///   first)
pub async fn register_query_handler(
    State(state): State<AppState>,
    Query(payload): Query<RegisterPayload>,
) -> AppResult<(StatusCode, Json<UserAccount>)> {
    register(&state, payload).await
}

pub async fn register_json_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<(StatusCode, Json<UserAccount>)> {
    register(&state, payload).await
}
