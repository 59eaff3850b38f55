use crate::backend::RagBackend;
use crate::error::SessionError;
use crate::models::chat::{ Confidence, Message, ResponseMetadata };
use crate::models::events::SessionEvent;
use crate::models::wire::{ ChatReply, ChatRequest };
use crate::session::events::EventBus;
use crate::session::sanitize::escape_markup;
use crate::session::synthetic::SyntheticPolicy;
use crate::session::trace::{ ReportedRetrieval, RetrievalTrace };
use crate::session::SessionState;

use log::{ debug, error, info };
use std::sync::Arc;
use std::time::Instant;

pub const ERROR_PREFIX: &str = "❌ Error: ";

/// Runs chat turns: one user message in, exactly one bot message out.
pub struct ChatSession {
    backend: Arc<dyn RagBackend>,
    synthetic: SyntheticPolicy,
    default_source: String,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn RagBackend>, synthetic: SyntheticPolicy, default_source: String) -> Self {
        Self { backend, synthetic, default_source }
    }

    pub async fn send_message(&mut self, state: &mut SessionState, events: &mut EventBus, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty message");
            return;
        }

        let user_message = Message::user(text);
        state.transcript.push(user_message.clone());
        events.emit(SessionEvent::MessageAdded(user_message));
        state.pending_input.clear();

        info!("Sending chat message ({} chars)", text.chars().count());
        let started = Instant::now();
        let result = self.dispatch(text).await;
        let response_time_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(reply) => self.apply_reply(state, events, text, reply, response_time_ms),
            Err(e) => {
                error!("Chat turn failed after {}ms: {}", response_time_ms, e);
                let bot_message = Message::bot_error(escape_markup(&format!("{}{}", ERROR_PREFIX, e)));
                state.transcript.push(bot_message.clone());
                events.emit(SessionEvent::MessageAdded(bot_message));
            }
        }
    }

    async fn dispatch(&self, text: &str) -> Result<ChatReply, SessionError> {
        let request = ChatRequest { message: text.to_string() };
        let reply = self.backend.chat(&request).await?;
        if !reply.is_success() {
            return Err(SessionError::Status { status: reply.status });
        }
        let parsed: ChatReply = serde_json::from_str(&reply.body)?;
        if parsed.reply_text().is_none() {
            return Err(
                SessionError::MalformedReply(
                    "reply has neither a 'response' nor a 'message' field".to_string()
                )
            );
        }
        Ok(parsed)
    }

    fn apply_reply(
        &mut self,
        state: &mut SessionState,
        events: &mut EventBus,
        text: &str,
        reply: ChatReply,
        response_time_ms: u64
    ) {
        let fields = reply.fields();
        let confidence = match fields.confidence {
            Some(value) => Confidence::reported(value.round().clamp(0.0, 100.0) as u32),
            None => {
                let synthetic = self.synthetic.confidence();
                debug!("Backend omitted confidence, using placeholder {}%", synthetic.percent);
                synthetic
            }
        };
        let documents_retrieved = fields.documents_retrieved.unwrap_or(0);
        let source = fields.source
            .as_deref()
            .map(escape_markup)
            .unwrap_or_else(|| self.default_source.clone());
        let query = fields.query.as_deref().map(escape_markup).unwrap_or_default();

        let metadata = ResponseMetadata {
            confidence,
            documents_retrieved,
            source: source.clone(),
            query: query.clone(),
            retrieved_documents: fields.ranked_sources.clone(),
            response_time_ms,
        };
        let reply_text = escape_markup(reply.reply_text().unwrap_or_default());
        let bot_message = Message::bot_reply(reply_text, metadata);
        state.transcript.push(bot_message.clone());
        events.emit(SessionEvent::MessageAdded(bot_message));

        state.metrics.record(response_time_ms, confidence.percent);
        events.emit(SessionEvent::MetricsUpdated(state.metrics.snapshot()));
        info!(
            "Chat turn completed in {}ms (confidence {}%, {} documents)",
            response_time_ms,
            confidence.percent,
            documents_retrieved
        );

        if fields.has_retrieval {
            let trace_query = if query.is_empty() { text } else { query.as_str() };
            let reported = ReportedRetrieval {
                processing_time_ms: fields.processing_time_ms,
                ranked_sources: fields.ranked_sources,
            };
            let trace = RetrievalTrace::rebuild(
                trace_query,
                documents_retrieved,
                reported,
                &mut self.synthetic,
                &state.recent_document_names(),
                &source
            );
            state.trace = Some(trace.clone());
            events.emit(SessionEvent::TraceUpdated(trace));
        }
    }
}
