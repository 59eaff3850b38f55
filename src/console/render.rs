use crate::models::chat::{ Message, MessageKind, Origin, Sender };
use crate::models::document::DocumentRecord;
use crate::models::events::{ NotificationLevel, SessionEvent };
use crate::session::metrics::MetricsSnapshot;
use crate::session::trace::RetrievalTrace;

/// Terminal lines for one event. Some events print nothing.
pub fn render_event(event: &SessionEvent) -> Vec<String> {
    match event {
        SessionEvent::MessageAdded(message) => render_message(message),
        SessionEvent::MetricsUpdated(snapshot) => vec![render_metrics(snapshot)],
        SessionEvent::TraceUpdated(trace) => render_trace(trace),
        SessionEvent::DocumentListUpdated(documents) => render_documents(documents).into_iter().take(1).collect(),
        SessionEvent::Notification(notification) => {
            let tag = match notification.level {
                NotificationLevel::Info => "info",
                NotificationLevel::Warning => "warning",
                NotificationLevel::Error => "error",
            };
            vec![format!("[{}] {}", tag, notification.text)]
        }
        SessionEvent::UploadFinished(_) => Vec::new(),
    }
}

pub fn render_message(message: &Message) -> Vec<String> {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    let mut lines = vec![format!("{} › {}", who, message.text)];
    if message.kind == MessageKind::Reply {
        if let Some(meta) = &message.metadata {
            lines.push(format!("      {}", meta.summary_line()));
        }
    }
    lines
}

pub fn render_metrics(snapshot: &MetricsSnapshot) -> String {
    let confidence = snapshot.average_confidence
        .map(|c| format!("{}%", c))
        .unwrap_or_else(|| "n/a".to_string());
    let response = snapshot.average_response_time_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "metrics › turns: {} | avg confidence: {} | avg response: {}",
        snapshot.turn_count,
        confidence,
        response
    )
}

pub fn render_trace(trace: &RetrievalTrace) -> Vec<String> {
    let timing = match trace.processing_time_origin {
        Origin::Backend => format!("{}ms", trace.processing_time_ms),
        Origin::Synthetic => format!("~{}ms (simulated)", trace.processing_time_ms),
    };
    let mut lines = vec![
        format!(
            "trace › \"{}\": {} documents in {}",
            trace.query,
            trace.documents_retrieved,
            timing
        )
    ];
    if trace.top_matches_origin == Origin::Synthetic && !trace.top_matches.is_empty() {
        lines.push("      top matches (simulated):".to_string());
    }
    for (i, m) in trace.top_matches.iter().enumerate() {
        lines.push(format!("      {}. {} ({:.2})", i + 1, m.name, m.score));
    }
    lines
}

/// Header line followed by one line per document.
pub fn render_documents(documents: &[DocumentRecord]) -> Vec<String> {
    let mut lines = vec![match documents.last() {
        Some(latest) =>
            format!(
                "docs › {} document(s) uploaded, latest: {} ({})",
                documents.len(),
                latest.name,
                human_size(latest.size_bytes)
            ),
        None => "docs › no documents uploaded yet".to_string(),
    }];
    for (i, doc) in documents.iter().enumerate() {
        lines.push(
            format!(
                "      {}. {} | {} | {} | {}",
                i + 1,
                doc.name,
                human_size(doc.size_bytes),
                doc.mime_type.as_deref().unwrap_or("unknown type"),
                doc.uploaded_at.format("%Y-%m-%d %H:%M:%S")
            )
        );
    }
    lines
}

pub fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}
