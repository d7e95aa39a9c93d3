use super::*;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::PDF_MIME;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, Default)]
struct ReceivedPart {
    field: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: Value,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
}

async fn handle_upload(
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.received.lock().await.push(ReceivedPart {
            field: field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    (state.status, Json(state.body.clone()))
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn spawn_parse_server(
    status: StatusCode,
    body: Value,
) -> (String, Arc<Mutex<Vec<ReceivedPart>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        body,
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route("/health", get(handle_health))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), received)
}

async fn spawn_plain_server(status: StatusCode, body: &'static str) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/upload", post(move || async move { (status, body) }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn transport_for(endpoint: &str) -> HttpParseTransport {
    HttpParseTransport::new(&IntakeSettings {
        endpoint: endpoint.to_string(),
        ..IntakeSettings::default()
    })
    .expect("transport")
}

fn pdf_request() -> UploadRequest {
    UploadRequest {
        file: SelectedFile::from_bytes("resume.pdf", b"%PDF-1.7 body".to_vec(), None),
    }
}

#[tokio::test]
async fn upload_posts_multipart_file_field_and_parses_record() {
    let (endpoint, received) = spawn_parse_server(
        StatusCode::OK,
        json!({
            "success": true,
            "filename": "resume.pdf",
            "file_size": 13,
            "extracted_data": {
                "name": "A",
                "email": "a@example.com",
                "phone": null,
                "skills": [],
                "education": ["X"],
                "experience": []
            }
        }),
    )
    .await;

    let response = transport_for(&format!("{endpoint}/"))
        .upload(pdf_request())
        .await
        .expect("upload");

    assert!(response.success);
    assert_eq!(response.file_size, Some(13));
    assert_eq!(response.extracted_data.name.as_deref(), Some("A"));
    assert_eq!(response.extracted_data.education, vec!["X".to_string()]);

    let parts = received.lock().await;
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].field.as_deref(), Some("file"));
    assert_eq!(parts[0].file_name.as_deref(), Some("resume.pdf"));
    assert_eq!(parts[0].content_type.as_deref(), Some(PDF_MIME));
    assert_eq!(parts[0].bytes, b"%PDF-1.7 body");
}

#[tokio::test]
async fn upload_surfaces_server_detail_verbatim() {
    let (endpoint, _received) = spawn_parse_server(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "detail": "No readable text found in the file." }),
    )
    .await;

    let err = transport_for(&endpoint)
        .upload(pdf_request())
        .await
        .expect_err("must fail");
    match err {
        IntakeError::Server { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "No readable text found in the file.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upload_without_detail_uses_generic_message() {
    let (endpoint, _received) =
        spawn_parse_server(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;

    let err = transport_for(&endpoint)
        .upload(pdf_request())
        .await
        .expect_err("must fail");
    assert_eq!(err.to_string(), "Failed to parse resume");
}

#[tokio::test]
async fn upload_with_non_json_error_body_uses_generic_message() {
    let endpoint =
        spawn_plain_server(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;

    let err = transport_for(&endpoint)
        .upload(pdf_request())
        .await
        .expect_err("must fail");
    match err {
        IntakeError::Server { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Failed to parse resume");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upload_reads_path_backed_files_at_submit_time() {
    let (endpoint, received) = spawn_parse_server(
        StatusCode::OK,
        json!({ "extracted_data": { "name": "From Disk" } }),
    )
    .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cv.docx");
    std::fs::write(&path, b"docx-bytes").expect("write");

    let response = transport_for(&endpoint)
        .upload(UploadRequest {
            file: SelectedFile::from_path(&path).expect("file"),
        })
        .await
        .expect("upload");

    assert_eq!(response.extracted_data.name.as_deref(), Some("From Disk"));
    assert!(response.extracted_data.skills.is_empty());
    assert_eq!(received.lock().await[0].bytes, b"docx-bytes");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = transport_for(&format!("http://{addr}"))
        .upload(pdf_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, IntakeError::Transport(_)), "unexpected: {err:?}");
}

#[tokio::test]
async fn health_reports_service_status() {
    let (endpoint, _received) = spawn_parse_server(StatusCode::OK, json!({})).await;
    let health = transport_for(&endpoint).health().await.expect("health");
    assert!(health.is_healthy());
}

#[test]
fn endpoint_normalization_trims_and_validates() {
    assert_eq!(
        normalize_endpoint(" http://localhost:8000/ ").expect("valid"),
        "http://localhost:8000"
    );
    assert!(matches!(
        normalize_endpoint("ftp://example.com"),
        Err(IntakeError::InvalidEndpoint { .. })
    ));
    assert!(normalize_endpoint("localhost:8000/upload").is_err());
}
