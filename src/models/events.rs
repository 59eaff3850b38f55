use crate::models::chat::Message;
use crate::models::document::DocumentRecord;
use crate::session::metrics::MetricsSnapshot;
use crate::session::trace::RetrievalTrace;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

/// Result of one `upload_files` batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadOutcome {
    Completed {
        uploaded: usize,
    },
    Aborted {
        failed_file: String,
        reason: String,
        uploaded: usize,
        total: usize,
    },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Completed { .. })
    }

    pub fn uploaded(&self) -> usize {
        match self {
            UploadOutcome::Completed { uploaded } | UploadOutcome::Aborted { uploaded, .. } =>
                *uploaded,
        }
    }

    /// Aborted after at least one file of the batch had been recorded.
    pub fn is_partial(&self) -> bool {
        matches!(self, UploadOutcome::Aborted { uploaded, .. } if *uploaded > 0)
    }

    pub fn summary(&self) -> String {
        match self {
            UploadOutcome::Completed { uploaded } => {
                let noun = if *uploaded == 1 { "document" } else { "documents" };
                format!(
                    "Successfully processed {} {}. You can now ask questions about them.",
                    uploaded,
                    noun
                )
            }
            UploadOutcome::Aborted { failed_file, reason, uploaded, total } => {
                let mut text = format!("Upload failed for '{}': {}", failed_file, reason);
                if *uploaded > 0 {
                    text.push_str(
                        &format!(
                            " ({} of {} files were uploaded before the failure and remain available)",
                            uploaded,
                            total
                        )
                    );
                }
                text
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAdded(Message),
    MetricsUpdated(MetricsSnapshot),
    TraceUpdated(RetrievalTrace),
    DocumentListUpdated(Vec<DocumentRecord>),
    Notification(Notification),
    UploadFinished(UploadOutcome),
}
