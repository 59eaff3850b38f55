//! End-to-end tests against a fake RAG backend served by axum on a local port.

use std::sync::{ Arc, Mutex };

use axum::extract::{ Multipart, State };
use axum::http::StatusCode;
use axum::routing::{ get, post };
use axum::{ Json, Router };
use serde_json::{ json, Value };

use mindmate_session::backend::HttpBackend;
use mindmate_session::config::{ BackendConfig, SessionConfig };
use mindmate_session::error::SessionError;
use mindmate_session::models::chat::{ MessageKind, Origin, Sender };
use mindmate_session::models::document::UploadFile;
use mindmate_session::models::events::{ SessionEvent, UploadOutcome };
use mindmate_session::session::Session;

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Clone, Default)]
struct FakeState {
    chats: Arc<Mutex<Vec<String>>>,
    uploads: Arc<Mutex<Vec<(String, usize)>>>,
}

async fn chat(State(state): State<FakeState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    state.chats.lock().unwrap().push(message.clone());
    match message.as_str() {
        "break" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"}))),
        "bare" => (StatusCode::OK, Json(json!({"message": "Plain answer"}))),
        _ =>
            (
                StatusCode::OK,
                Json(
                    json!({
                    "response": "Try <b>Ubud</b> & Kuta",
                    "metadata": {
                        "confidence": 91.4,
                        "documents_retrieved": 2,
                        "source": "Bali Guide",
                        "query": message,
                        "processing_time_ms": 210,
                        "retrieved_documents": [
                            {"metadata": {"source": "/docs/ubud.pdf"}, "score": 0.71},
                            {"metadata": {"source": "/docs/kuta.pdf"}, "score": 0.88}
                        ]
                    }
                })
                ),
            ),
    }
}

async fn upload(State(state): State<FakeState>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default();
        let attempt = {
            let mut uploads = state.uploads.lock().unwrap();
            uploads.push((name.clone(), bytes.len()));
            uploads.len()
        };
        if name.starts_with("corrupt") {
            return (StatusCode::BAD_REQUEST, Json(json!({"detail": "corrupt file"})));
        }
        return (
            StatusCode::OK,
            Json(json!({"filename": name, "status": "success", "chunks_created": attempt})),
        );
    }
    (StatusCode::BAD_REQUEST, Json(json!({"detail": "no file"})))
}

async fn metrics() -> Json<Value> {
    Json(
        json!({
        "total_queries_processed": 7,
        "average_response_time": 0.25,
        "average_documents_retrieved": 3.0,
        "tracking_since": "2024-05-01T10:00:00"
    })
    )
}

async fn documents() -> Json<Value> {
    Json(json!({"document_count": 42, "status": "success"}))
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to Mind Mate AI Chatbot - Your Travel Assistant"}))
}

/// Starts the fake backend and returns its base URL.
async fn spawn_backend(state: FakeState) -> String {
    let app = Router::new()
        .route("/api", get(root))
        .route("/api/chat", post(chat))
        .route("/api/upload-document", post(upload))
        .route("/api/metrics", get(metrics))
        .route("/api/documents", get(documents))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn make_session(state: FakeState) -> Session {
    let url = spawn_backend(state).await;
    let backend = BackendConfig::new(&url).unwrap();
    let config = SessionConfig {
        backend: backend.clone(),
        ..SessionConfig::default()
    };
    Session::new(Arc::new(HttpBackend::new(backend)), &config)
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_turn_with_reported_metadata() {
    let state = FakeState::default();
    let mut session = make_session(state.clone()).await;

    let events = session.send_message("  Where to stay in Bali?  ").await;

    assert_eq!(*state.chats.lock().unwrap(), vec!["Where to stay in Bali?".to_string()]);
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].sender, Sender::User);
    assert_eq!(transcript[1].text, "Try &lt;b&gt;Ubud&lt;/b&gt; &amp; Kuta");

    let meta = transcript[1].metadata.as_ref().unwrap();
    assert_eq!(meta.confidence.percent, 91);
    assert_eq!(meta.confidence.origin, Origin::Backend);
    assert_eq!(meta.source, "Bali Guide");

    assert_eq!(session.metrics().turn_count(), 1);
    assert_eq!(session.metrics().average_confidence(), Some(91));

    let trace = session.trace().unwrap();
    assert_eq!(trace.processing_time_ms, 210);
    assert_eq!(trace.processing_time_origin, Origin::Backend);
    let names: Vec<&str> = trace.top_matches
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["kuta.pdf", "ubud.pdf"]);
    assert!(events.iter().any(|e| matches!(e, SessionEvent::TraceUpdated(_))));
}

#[tokio::test]
async fn test_chat_without_metadata_uses_placeholders() {
    let mut session = make_session(FakeState::default()).await;
    session.send_message("bare").await;

    let reply = session.transcript().last().unwrap();
    assert_eq!(reply.text, "Plain answer");
    let meta = reply.metadata.as_ref().unwrap();
    assert!(meta.confidence.is_synthetic());
    assert!((85..=94).contains(&meta.confidence.percent));
    assert!(session.trace().is_none());
}

#[tokio::test]
async fn test_server_error_becomes_error_message() {
    let mut session = make_session(FakeState::default()).await;
    session.send_message("break").await;

    let reply = session.transcript().last().unwrap();
    assert_eq!(reply.kind, MessageKind::Error);
    assert_eq!(reply.text, "❌ Error: HTTP error! status: 500");
    assert_eq!(session.metrics().turn_count(), 0);
}

#[tokio::test]
async fn test_unreachable_backend_reports_network_error() {
    let backend = BackendConfig::new("http://127.0.0.1:1").unwrap();
    let config = SessionConfig {
        backend: backend.clone(),
        ..SessionConfig::default()
    };
    let mut session = Session::new(Arc::new(HttpBackend::new(backend)), &config);
    session.send_message("hello").await;

    let reply = session.transcript().last().unwrap();
    assert!(reply.is_error());
    assert!(reply.text.starts_with("❌ Error: network error"));
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_batch_stops_at_first_rejection() {
    let state = FakeState::default();
    let mut session = make_session(state.clone()).await;
    let files = vec![
        UploadFile::new("bali.pdf", vec![1u8; 300]),
        UploadFile::new("corrupt.docx", vec![2u8; 10]),
        UploadFile::new("tokyo.xlsx", vec![3u8; 20])
    ];

    let events = session.upload_files(&files).await;

    let received: Vec<String> = state.uploads
        .lock()
        .unwrap()
        .iter()
        .map(|(n, _)| n.clone())
        .collect();
    assert_eq!(received, vec!["bali.pdf", "corrupt.docx"]);
    assert_eq!(session.manifest().len(), 1);
    assert_eq!(session.manifest()[0].size_bytes, 300);

    let outcome = events.iter().find_map(|e| match e {
        SessionEvent::UploadFinished(o) => Some(o.clone()),
        _ => None,
    });
    assert_eq!(
        outcome,
        Some(UploadOutcome::Aborted {
            failed_file: "corrupt.docx".into(),
            reason: "corrupt file".into(),
            uploaded: 1,
            total: 3,
        })
    );
}

#[tokio::test]
async fn test_upload_batch_sends_bytes_in_order() {
    let state = FakeState::default();
    let mut session = make_session(state.clone()).await;
    let files = vec![UploadFile::new("a.txt", b"alpha".to_vec()), UploadFile::new("b.md", b"be".to_vec())];

    session.upload_files(&files).await;

    assert_eq!(
        *state.uploads.lock().unwrap(),
        vec![("a.txt".to_string(), 5), ("b.md".to_string(), 2)]
    );
    let notice = session.transcript().last().unwrap();
    assert_eq!(notice.kind, MessageKind::Notice);
    assert!(notice.text.starts_with("Successfully processed 2 documents"));
}

// =============================================================================
// Backend summaries
// =============================================================================

#[tokio::test]
async fn test_backend_summaries() {
    let session = make_session(FakeState::default()).await;

    let summary = session.backend_metrics().await.unwrap();
    assert_eq!(summary.total_queries_processed, Some(7));
    assert_eq!(session.backend_document_count().await.unwrap(), 42);
    assert!(session.check_backend().await.unwrap().contains("Travel Assistant"));
}

#[tokio::test]
async fn test_missing_route_maps_to_status_error() {
    let url = spawn_backend(FakeState::default()).await;
    let mut backend = BackendConfig::new(&url).unwrap();
    backend.documents_route = "/api/nope".into();
    let config = SessionConfig {
        backend: backend.clone(),
        ..SessionConfig::default()
    };
    let session = Session::new(Arc::new(HttpBackend::new(backend)), &config);

    assert!(matches!(
        session.backend_document_count().await,
        Err(SessionError::Status { status: 404 })
    ));
}
