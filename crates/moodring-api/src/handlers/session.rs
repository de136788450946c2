//! Session lifecycle handlers: create, join, snapshot.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use moodring_core::AppError;
use moodring_core::types::SessionCode;
use moodring_entity::view::SessionView;

use crate::dto::request::{CreateSessionRequest, JoinSessionRequest};
use crate::dto::response::{ApiResponse, CreateSessionResponse, JoinSessionResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/session/create
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<CreateSessionResponse>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }

    let (code, user_id) = state.store.create_session(name.to_string());
    Ok(Json(ApiResponse::ok(CreateSessionResponse { code, user_id })))
}

/// POST /api/session/join
pub async fn join_session(
    State(state): State<AppState>,
    Json(payload): Json<JoinSessionRequest>,
) -> Result<Json<ApiResponse<JoinSessionResponse>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }
    let code = parse_code(&payload.code)?;

    let (session, user_id) = state.store.join_session(&code, name.to_string())?;
    Ok(Json(ApiResponse::ok(JoinSessionResponse {
        session,
        user_id,
    })))
}

/// GET /api/session/{code}
pub async fn get_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let code = parse_code(&code)?;
    let view = state
        .store
        .snapshot(&code)
        .ok_or_else(|| AppError::not_found("Oops! This session doesn't exist"))?;
    Ok(Json(ApiResponse::ok(view)))
}

fn parse_code(input: &str) -> Result<SessionCode, ApiError> {
    SessionCode::parse(input)
        .ok_or_else(|| AppError::validation("Session code must look like ABC-123").into())
}
