// Tests for the rehearsal HTTP API, driven through the router in-process

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use prepnote::config::RehearsalDefaults;
use prepnote::rehearsal::{MockScoringService, TracingSink};
use prepnote::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tower::ServiceExt;

fn state() -> AppState {
    AppState::new(
        RehearsalDefaults::default(),
        Arc::new(MockScoringService::instant()),
        Arc::new(TracingSink),
    )
}

fn app() -> Router {
    create_router(state())
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Ok((status, value))
}

async fn create(app: &Router, body: Value) -> Result<String> {
    let (status, value) = call(app, Method::POST, "/rehearsals", Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(value["id"].as_str().expect("id").to_string())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_create_reports_thresholds() -> Result<()> {
    let app = app();
    let (status, value) = call(
        &app,
        Method::POST,
        "/rehearsals",
        Some(json!({ "title": "Town hall", "script": ["Welcome"], "targetMinutes": 5 })),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert!(value["id"].as_str().unwrap().starts_with("rehearsal-"));
    assert_eq!(value["state"], "setup");
    assert_eq!(value["targetSeconds"], 300);
    assert_eq!(value["warningSeconds"], 270);
    assert_eq!(value["exceededAfterSeconds"], 330);
    Ok(())
}

#[tokio::test]
async fn test_invalid_target_is_rejected() -> Result<()> {
    let (status, value) = call(
        &app(),
        Method::POST,
        "/rehearsals",
        Some(json!({ "title": "Too long", "script": ["x"], "targetMinutes": 121 })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].as_str().unwrap().contains("121"));
    Ok(())
}

#[tokio::test]
async fn test_full_lifecycle() -> Result<()> {
    let app = app();
    let id = create(&app, json!({ "title": "Demo", "script": ["Hello", "World"] })).await?;

    let (_, value) = call(&app, Method::POST, &format!("/rehearsals/{}/start", id), None).await?;
    assert_eq!(value["state"], "recording");

    let (_, value) = call(&app, Method::POST, &format!("/rehearsals/{}/pause", id), None).await?;
    assert_eq!(value["paused"], true);

    let (_, value) = call(&app, Method::POST, &format!("/rehearsals/{}/resume", id), None).await?;
    assert_eq!(value["paused"], false);

    let (status, value) =
        call(&app, Method::POST, &format!("/rehearsals/{}/finish", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["state"], "complete");
    let overall = value["result"]["overallScore"].as_u64().unwrap();
    assert!((75..=99).contains(&overall));

    let (_, value) = call(&app, Method::POST, &format!("/rehearsals/{}/reset", id), None).await?;
    assert_eq!(value["state"], "setup");
    assert_eq!(value["elapsedSeconds"], 0);
    assert!(value.get("result").is_none());

    let (status, _) = call(&app, Method::DELETE, &format!("/rehearsals/{}", id), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, &format!("/rehearsals/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_start_without_title_stays_in_setup() -> Result<()> {
    let app = app();
    let id = create(&app, json!({ "title": "", "script": ["text"] })).await?;

    let (status, value) =
        call(&app, Method::POST, &format!("/rehearsals/{}/start", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["state"], "setup");
    Ok(())
}

#[tokio::test]
async fn test_unknown_rehearsal() -> Result<()> {
    let (status, value) = call(&app(), Method::POST, "/rehearsals/nope/finish", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Rehearsal nope not found");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_finished_rehearsal_is_evicted_once_idle() -> Result<()> {
    let state = state();
    let app = create_router(state.clone());
    let id = create(&app, json!({ "title": "Demo", "script": ["Hello"] })).await?;
    call(&app, Method::POST, &format!("/rehearsals/{}/start", id), None).await?;
    sleep(Duration::from_millis(2_500)).await;

    let (_, value) = call(&app, Method::POST, &format!("/rehearsals/{}/finish", id), None).await?;
    assert_eq!(value["state"], "complete");

    let sweep = state.spawn_eviction(Duration::from_secs(60), Duration::from_secs(10));

    // Reading the result counts as activity
    sleep(Duration::from_secs(45)).await;
    let (status, _) = call(&app, Method::GET, &format!("/rehearsals/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);

    sleep(Duration::from_secs(75)).await;
    let (status, _) = call(&app, Method::GET, &format!("/rehearsals/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.sessions.read().await.is_empty());

    sweep.abort();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_recording_rehearsal_is_not_evicted() -> Result<()> {
    let state = state();
    let app = create_router(state.clone());
    let recording = create(&app, json!({ "title": "Live", "script": ["Hi"] })).await?;
    let abandoned = create(&app, json!({ "title": "Draft", "script": ["Hi"] })).await?;
    call(&app, Method::POST, &format!("/rehearsals/{}/start", recording), None).await?;

    sleep(Duration::from_millis(90_500)).await;
    assert_eq!(state.evict_idle(Duration::from_secs(60)).await, 1);

    let (status, value) =
        call(&app, Method::GET, &format!("/rehearsals/{}", recording), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["state"], "recording");
    assert_eq!(value["elapsedSeconds"], 90);

    let (status, _) = call(&app, Method::GET, &format!("/rehearsals/{}", abandoned), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
