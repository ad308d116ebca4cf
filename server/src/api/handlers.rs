use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use confserve_sdk::RepoError;

use crate::api::models::{EnvironmentResponse, ErrorResponse, HealthResponse};
use crate::state::AppState;

pub type AppResult<T> = Result<T, AppError>;

pub struct AppError(RepoError);

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn environment(
    State(state): State<Arc<AppState>>,
    Path((application, profiles, label)): Path<(String, String, String)>,
) -> AppResult<Json<EnvironmentResponse>> {
    resolve_environment(&state, application, profiles, label).await
}

/// Two-segment form: the label falls back to the configured default.
pub async fn environment_default_label(
    State(state): State<Arc<AppState>>,
    Path((application, profiles)): Path<(String, String)>,
) -> AppResult<Json<EnvironmentResponse>> {
    let label = state.default_label.clone();
    resolve_environment(&state, application, profiles, label).await
}

async fn resolve_environment(
    state: &AppState,
    application: String,
    profiles: String,
    label: String,
) -> AppResult<Json<EnvironmentResponse>> {
    let profiles = split_profiles(&profiles);
    let resolution = state
        .resolver
        .resolve(&application, &profiles, &label)
        .await?;
    tracing::debug!(
        application = %application,
        label = %label,
        sources = resolution.sources.len(),
        "resolved environment"
    );
    Ok(Json(EnvironmentResponse::new(
        application,
        profiles,
        label,
        resolution,
    )))
}

pub async fn file(
    State(state): State<Arc<AppState>>,
    Path((application, profiles, label, path)): Path<(String, String, String, String)>,
) -> AppResult<Response> {
    let profiles = split_profiles(&profiles);
    let resolved = state
        .files
        .resolve_file(&application, &profiles, &label, &path)
        .await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, resolved.content_type)],
        resolved.body,
    )
        .into_response())
}

/// Comma-separated profile list from the path segment; blanks are dropped.
fn split_profiles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
