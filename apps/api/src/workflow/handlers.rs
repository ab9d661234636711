//! Axum route handlers for the session workflow API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::upload::classify_upload;
use crate::roadmap::report::{dashboard_digest, render_markdown, DashboardDigest};
use crate::state::AppState;
use crate::workflow::engine::SessionView;
use crate::workflow::machine::WorkflowEvent;
use crate::workflow::wizard::WizardInput;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Screen-level triggers a client may send. Generation outcomes are internal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Start,
    ViewSample,
    Cancel,
    Retry,
    Back,
    Export,
    Edit,
}

impl From<Trigger> for WorkflowEvent {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Start => WorkflowEvent::Start,
            Trigger::ViewSample => WorkflowEvent::ViewSample,
            Trigger::Cancel => WorkflowEvent::Cancel,
            Trigger::Retry => WorkflowEvent::Retry,
            Trigger::Back => WorkflowEvent::Back,
            Trigger::Export => WorkflowEvent::Export,
            Trigger::Edit => WorkflowEvent::Edit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub trigger: Trigger,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    (StatusCode::CREATED, Json(state.engine.create_session().await))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.engine.view(id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.engine.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/events
///
/// Fires a screen trigger. When it starts a generation the response comes back
/// immediately on `processing`; poll the session for the outcome.
pub async fn handle_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> Result<Json<SessionView>, AppError> {
    let dispatched = state.engine.dispatch(id, request.trigger.into()).await?;
    Ok(Json(dispatched.view))
}

/// POST /api/v1/sessions/:id/wizard
pub async fn handle_wizard_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<WizardInput>,
) -> Result<Json<SessionView>, AppError> {
    let dispatched = state
        .engine
        .dispatch(id, WorkflowEvent::Wizard(input))
        .await?;
    Ok(Json(dispatched.view))
}

/// POST /api/v1/sessions/:id/wizard/resume
///
/// Multipart upload with a single `file` field. PDFs and images are attached
/// as-is; text files are decoded.
pub async fn handle_resume_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("file field has no file name".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let upload = classify_upload(&file_name, content_type.as_deref(), &bytes)?;
        tracing::info!(
            "Session {id}: resume upload '{}' ({} bytes)",
            upload.file_name,
            bytes.len()
        );

        let dispatched = state
            .engine
            .dispatch(
                id,
                WorkflowEvent::Wizard(WizardInput::SetResume {
                    resume: upload.resume,
                    file_name: Some(upload.file_name),
                }),
            )
            .await?;
        return Ok(Json(dispatched.view));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}

/// GET /api/v1/sessions/:id/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardDigest>, AppError> {
    let (profile, roadmap) = state.engine.results(id).await?;
    Ok(Json(dashboard_digest(&profile, &roadmap)))
}

/// GET /api/v1/sessions/:id/export
///
/// Returns the roadmap as a Markdown download.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (profile, roadmap) = state.engine.results(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"pivotpath-roadmap.md\"",
            ),
        ],
        render_markdown(&profile, &roadmap),
    ))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(e.body_text())
    }
}
