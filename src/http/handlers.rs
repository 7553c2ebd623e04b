use super::state::AppState;
use crate::rehearsal::{RehearsalRunner, RehearsalSession, Script, SessionSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRehearsalRequest {
    /// Presentation title
    pub title: String,

    /// One block per speaker
    pub script: Vec<String>,

    /// Goal duration (default from config)
    pub target_minutes: Option<u32>,

    /// Saved script this rehearsal uses, if any
    pub script_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RehearsalResponse {
    pub id: String,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

async fn lookup(state: &AppState, id: &str) -> Result<RehearsalRunner, Response> {
    let sessions = state.sessions.read().await;
    sessions.get(id).cloned().ok_or_else(|| {
        warn!("Rehearsal {} not found", id);
        error_response(StatusCode::NOT_FOUND, format!("Rehearsal {} not found", id))
    })
}

async fn respond(id: String, runner: &RehearsalRunner) -> Response {
    let snapshot = runner.snapshot().await;
    (StatusCode::OK, Json(RehearsalResponse { id, snapshot })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /rehearsals
/// Create a rehearsal in the Setup state
pub async fn create_rehearsal(
    State(state): State<AppState>,
    Json(req): Json<CreateRehearsalRequest>,
) -> impl IntoResponse {
    let config = state.defaults.session_config(req.target_minutes);
    if let Err(e) = config.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let id = format!("rehearsal-{}", uuid::Uuid::new_v4());
    let mut script = Script::new(req.title, req.script);
    script.script_id = req.script_id;

    let runner = RehearsalRunner::new(
        RehearsalSession::new(config, script),
        state.sink.clone(),
        state.scorer.clone(),
    );

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(id.clone(), runner.clone());
    }

    info!("Created rehearsal {}", id);

    let snapshot = runner.snapshot().await;
    (StatusCode::CREATED, Json(RehearsalResponse { id, snapshot })).into_response()
}

/// GET /rehearsals/:id
pub async fn get_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match lookup(&state, &id).await {
        Ok(runner) => respond(id, &runner).await,
        Err(resp) => resp,
    }
}

/// POST /rehearsals/:id/start
pub async fn start_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match lookup(&state, &id).await {
        Ok(runner) => {
            runner.start().await;
            respond(id, &runner).await
        }
        Err(resp) => resp,
    }
}

/// POST /rehearsals/:id/pause
pub async fn pause_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match lookup(&state, &id).await {
        Ok(runner) => {
            runner.pause().await;
            respond(id, &runner).await
        }
        Err(resp) => resp,
    }
}

/// POST /rehearsals/:id/resume
pub async fn resume_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match lookup(&state, &id).await {
        Ok(runner) => {
            runner.resume().await;
            respond(id, &runner).await
        }
        Err(resp) => resp,
    }
}

/// POST /rehearsals/:id/finish
/// Stop recording and wait for the analysis
pub async fn finish_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let runner = match lookup(&state, &id).await {
        Ok(runner) => runner,
        Err(resp) => return resp,
    };

    match runner.finish().await {
        Ok(_) => respond(id, &runner).await,
        Err(e) => {
            error!("Analysis failed for rehearsal {}: {:#}", id, e);
            error_response(StatusCode::BAD_GATEWAY, format!("{:#}", e))
        }
    }
}

/// POST /rehearsals/:id/reset
pub async fn reset_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match lookup(&state, &id).await {
        Ok(runner) => {
            runner.reset().await;
            respond(id, &runner).await
        }
        Err(resp) => resp,
    }
}

/// DELETE /rehearsals/:id
/// Discard a rehearsal and cancel its timers
pub async fn delete_rehearsal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let runner = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&id)
    };

    match runner {
        Some(runner) => {
            runner.shutdown().await;
            info!("Discarded rehearsal {}", id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, format!("Rehearsal {} not found", id)),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
