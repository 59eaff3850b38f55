use crate::backend::RagBackend;
use crate::error::SessionError;
use crate::models::chat::Message;
use crate::models::document::{ DocumentRecord, UploadFile };
use crate::models::events::{ Notification, NotificationLevel, SessionEvent, UploadOutcome };
use crate::models::wire::UploadReply;
use crate::session::events::EventBus;
use crate::session::sanitize::escape_markup;
use crate::session::SessionState;

use log::{ debug, error, info, warn };
use std::sync::Arc;

pub const EMPTY_SELECTION_WARNING: &str = "Please select at least one file to upload.";

/// Uploads a batch one file at a time. The backend accepts a single file per
/// request, and the first rejection ends the batch.
pub struct UploadCoordinator {
    backend: Arc<dyn RagBackend>,
}

impl UploadCoordinator {
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        Self { backend }
    }

    pub async fn upload_files(
        &self,
        state: &mut SessionState,
        events: &mut EventBus,
        files: &[UploadFile]
    ) -> Option<UploadOutcome> {
        if files.is_empty() {
            warn!("Upload requested with no files selected");
            events.emit(
                SessionEvent::Notification(Notification {
                    level: NotificationLevel::Warning,
                    text: EMPTY_SELECTION_WARNING.to_string(),
                })
            );
            return None;
        }

        let total = files.len();
        info!("Uploading {} file(s) sequentially", total);
        let mut uploaded = 0usize;
        let mut outcome = None;

        // Strictly one request in flight; order and first-failure abort depend on it.
        for (index, file) in files.iter().enumerate() {
            match self.upload_one(file).await {
                Ok(reply) => {
                    if let Some(echoed) = reply.filename.as_deref().filter(|n| *n != file.name) {
                        debug!("Backend stored '{}' as '{}'", file.name, echoed);
                    }
                    info!(
                        "Uploaded {}/{}: {} ({} bytes{})",
                        index + 1,
                        total,
                        file.name,
                        file.size_bytes(),
                        reply.chunks_created
                            .map(|c| format!(", {} chunks", c))
                            .unwrap_or_default()
                    );
                    state.manifest.push(DocumentRecord::from_upload(file));
                    uploaded += 1;
                    events.emit(SessionEvent::DocumentListUpdated(state.manifest.clone()));
                }
                Err(e) => {
                    error!("Upload aborted at {}/{}: {}", index + 1, total, e);
                    let reason = match e {
                        SessionError::UploadRejected { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    let skipped = total - index - 1;
                    if skipped > 0 {
                        warn!("Skipping {} remaining file(s) in the batch", skipped);
                    }
                    outcome = Some(UploadOutcome::Aborted {
                        failed_file: file.name.clone(),
                        reason,
                        uploaded,
                        total,
                    });
                    break;
                }
            }
        }

        let outcome = outcome.unwrap_or(UploadOutcome::Completed { uploaded });
        if outcome.is_success() {
            let notice = Message::bot_notice(outcome.summary());
            state.transcript.push(notice.clone());
            events.emit(SessionEvent::MessageAdded(notice));
        } else {
            events.emit(
                SessionEvent::Notification(Notification {
                    level: NotificationLevel::Error,
                    text: escape_markup(&outcome.summary()),
                })
            );
        }
        events.emit(SessionEvent::UploadFinished(outcome.clone()));
        Some(outcome)
    }

    async fn upload_one(&self, file: &UploadFile) -> Result<UploadReply, SessionError> {
        let reply = self.backend.upload(file).await?;
        let parsed = UploadReply::parse_or_placeholder(&reply.body);
        if !reply.is_success() {
            return Err(SessionError::UploadRejected {
                file: file.name.clone(),
                reason: parsed.failure_reason(reply.status),
            });
        }
        Ok(parsed)
    }
}
