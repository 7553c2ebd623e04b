// Tests for the generation backend client against an in-process mock server

use anyhow::Result;
use axum::{
    body::Bytes,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use prepnote::api::{
    ApiConfig, ApiError, CreateScriptRequest, CreateSummaryRequest, PrepNoteClient,
    ScriptOptions, SummaryOptions, GENERIC_FAILURE,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn extract_text(body: Bytes) -> impl IntoResponse {
    let body = String::from_utf8_lossy(&body);
    if body.contains("scanned.pdf") {
        Json(json!({ "text": "   \n " })).into_response()
    } else if body.contains("huge.pdf") {
        (StatusCode::PAYLOAD_TOO_LARGE, Json(json!({ "detail": "File too large" }))).into_response()
    } else {
        Json(json!({ "text": "  Quarterly results improved.\n" })).into_response()
    }
}

async fn summaries(Json(req): Json<Value>) -> impl IntoResponse {
    if req["text"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "summaryId": "sum-1",
        "summary": format!("Summary of {}", req["title"].as_str().unwrap_or_default()),
        "outline": ["Intro", "Numbers"],
        "audienceSeen": req["options"]["audience"],
    }))
    .into_response()
}

async fn scripts(Json(req): Json<Value>) -> impl IntoResponse {
    let speakers = req["options"]["speakerCount"].as_u64().unwrap_or(1);
    let content: Vec<String> = (1..=speakers).map(|i| format!("Speaker {} part", i)).collect();
    Json(json!({ "scriptId": "script-7", "content": content }))
}

async fn spawn_backend() -> Result<PrepNoteClient> {
    let app = Router::new()
        .route("/extract-text", post(extract_text))
        .route("/summaries", post(summaries))
        .route("/scripts", post(scripts));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let config = ApiConfig {
        base_url: format!("http://{}/", addr),
        timeout_secs: 5,
    };
    Ok(PrepNoteClient::new(&config)?)
}

#[tokio::test]
async fn test_base_url_is_normalised() -> Result<()> {
    let client = spawn_backend().await?;
    assert!(!client.base_url().ends_with('/'));
    Ok(())
}

#[tokio::test]
async fn test_extract_text_trims_result() -> Result<()> {
    let client = spawn_backend().await?;
    let text = client.extract_text("report.pdf", b"%PDF-1.4".to_vec()).await?;
    assert_eq!(text, "Quarterly results improved.");
    Ok(())
}

#[tokio::test]
async fn test_blank_extraction_is_an_error() -> Result<()> {
    let client = spawn_backend().await?;
    let err = client
        .extract_text("scanned.pdf", b"%PDF-1.4".to_vec())
        .await
        .expect_err("blank text");
    assert!(matches!(err, ApiError::EmptyExtraction));
    Ok(())
}

#[tokio::test]
async fn test_service_detail_is_surfaced() -> Result<()> {
    let client = spawn_backend().await?;
    let err = client
        .extract_text("huge.pdf", vec![0u8; 16])
        .await
        .expect_err("too large");
    match err {
        ApiError::Service { status, message } => {
            assert_eq!(status, 413);
            assert_eq!(message, "File too large");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_create_summary() -> Result<()> {
    let client = spawn_backend().await?;
    let summary = client
        .create_summary(&CreateSummaryRequest {
            title: "Q3 review".to_string(),
            text: "Quarterly results improved.".to_string(),
            options: SummaryOptions::default(),
        })
        .await?;

    assert_eq!(summary.summary_id, "sum-1");
    assert_eq!(summary.summary, "Summary of Q3 review");
    assert_eq!(summary.outline, vec!["Intro", "Numbers"]);
    Ok(())
}

#[tokio::test]
async fn test_plain_error_body_uses_fallback_message() -> Result<()> {
    let client = spawn_backend().await?;
    let err = client
        .create_summary(&CreateSummaryRequest {
            title: "Empty".to_string(),
            text: String::new(),
            options: SummaryOptions::default(),
        })
        .await
        .expect_err("server error");

    assert_eq!(err.user_message(), GENERIC_FAILURE);
    Ok(())
}

#[tokio::test]
async fn test_create_script_returns_one_block_per_speaker() -> Result<()> {
    let client = spawn_backend().await?;
    let script = client
        .create_script(&CreateScriptRequest {
            title: "Q3 review".to_string(),
            summary_text: "Summary".to_string(),
            outline: None,
            options: ScriptOptions {
                speaker_count: 3,
                ..ScriptOptions::default()
            },
        })
        .await?;

    assert_eq!(script.script_id, "script-7");
    assert_eq!(script.content.len(), 3);
    assert_eq!(script.content[2], "Speaker 3 part");
    Ok(())
}
