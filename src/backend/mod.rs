pub mod http;

use crate::error::SessionError;
use crate::models::document::UploadFile;
use crate::models::wire::ChatRequest;
use async_trait::async_trait;

pub use self::http::HttpBackend;

/// Status and raw body of a completed HTTP exchange. Interpreting either is
/// left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub body: String,
}

impl BackendReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The RAG backend as seen by the session. `Err` means the exchange did not
/// complete; a failure status is still `Ok`.
#[async_trait]
pub trait RagBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<BackendReply, SessionError>;

    async fn upload(&self, file: &UploadFile) -> Result<BackendReply, SessionError>;

    async fn metrics_summary(&self) -> Result<BackendReply, SessionError>;

    async fn document_count(&self) -> Result<BackendReply, SessionError>;

    async fn health(&self) -> Result<BackendReply, SessionError>;
}
