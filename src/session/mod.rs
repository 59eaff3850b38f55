pub mod chat;
pub mod events;
pub mod metrics;
pub mod sanitize;
pub mod synthetic;
pub mod trace;
pub mod upload;

use crate::backend::{ BackendReply, RagBackend };
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::models::chat::Message;
use crate::models::document::{ DocumentRecord, UploadFile };
use crate::models::events::SessionEvent;
use crate::models::wire::{ BackendMetricsSummary, DocumentCountReply, HealthReply };

use self::chat::ChatSession;
use self::events::EventBus;
use self::metrics::MetricsAggregate;
use self::synthetic::SyntheticPolicy;
use self::trace::RetrievalTrace;
use self::upload::UploadCoordinator;

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Everything one session accumulates. Lives exactly as long as its
/// [`Session`].
#[derive(Debug, Default)]
pub struct SessionState {
    pub(crate) transcript: Vec<Message>,
    pub(crate) metrics: MetricsAggregate,
    pub(crate) trace: Option<RetrievalTrace>,
    pub(crate) manifest: Vec<DocumentRecord>,
    pub(crate) pending_input: String,
}

impl SessionState {
    /// Manifest names, most recent upload first.
    pub(crate) fn recent_document_names(&self) -> Vec<String> {
        self.manifest
            .iter()
            .rev()
            .map(|d| d.name.clone())
            .collect()
    }
}

/// A conversational session against one RAG backend.
///
/// Operations take `&mut self`, so a chat turn or an upload batch always runs
/// to completion before the next one starts. Each returns the events it
/// emitted; the same events are pushed to every [`Session::subscribe`]r as
/// they happen.
pub struct Session {
    state: SessionState,
    chat: ChatSession,
    uploads: UploadCoordinator,
    events: EventBus,
    backend: Arc<dyn RagBackend>,
}

impl Session {
    pub fn new(backend: Arc<dyn RagBackend>, config: &SessionConfig) -> Self {
        let synthetic = SyntheticPolicy::new(config.synthetic.clone());
        Self::with_synthetic(backend, config, synthetic)
    }

    pub fn with_synthetic(
        backend: Arc<dyn RagBackend>,
        config: &SessionConfig,
        synthetic: SyntheticPolicy
    ) -> Self {
        Self {
            state: SessionState::default(),
            chat: ChatSession::new(Arc::clone(&backend), synthetic, config.default_source.clone()),
            uploads: UploadCoordinator::new(Arc::clone(&backend)),
            events: EventBus::new(),
            backend,
        }
    }

    pub fn subscribe(&mut self) -> UnboundedReceiverStream<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn send_message(&mut self, text: &str) -> Vec<SessionEvent> {
        self.chat.send_message(&mut self.state, &mut self.events, text).await;
        self.events.take_batch()
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.state.pending_input = text.into();
    }

    pub fn pending_input(&self) -> &str {
        &self.state.pending_input
    }

    /// Sends whatever is in the pending-input buffer.
    pub async fn send_pending(&mut self) -> Vec<SessionEvent> {
        let text = self.state.pending_input.clone();
        self.send_message(&text).await
    }

    pub async fn upload_files(&mut self, files: &[UploadFile]) -> Vec<SessionEvent> {
        self.uploads.upload_files(&mut self.state, &mut self.events, files).await;
        self.events.take_batch()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.state.transcript
    }

    pub fn metrics(&self) -> &MetricsAggregate {
        &self.state.metrics
    }

    pub fn trace(&self) -> Option<&RetrievalTrace> {
        self.state.trace.as_ref()
    }

    pub fn manifest(&self) -> &[DocumentRecord] {
        &self.state.manifest
    }

    pub async fn backend_metrics(&self) -> Result<BackendMetricsSummary, SessionError> {
        decode(self.backend.metrics_summary().await?)
    }

    pub async fn backend_document_count(&self) -> Result<u64, SessionError> {
        let reply: DocumentCountReply = decode(self.backend.document_count().await?)?;
        Ok(reply.document_count)
    }

    /// Probes the backend and returns its welcome message.
    pub async fn check_backend(&self) -> Result<String, SessionError> {
        let reply: HealthReply = decode(self.backend.health().await?)?;
        Ok(reply.message.unwrap_or_else(|| "backend reachable".to_string()))
    }
}

fn decode<T: DeserializeOwned>(reply: BackendReply) -> Result<T, SessionError> {
    if !reply.is_success() {
        return Err(SessionError::Status { status: reply.status });
    }
    Ok(serde_json::from_str(&reply.body)?)
}
