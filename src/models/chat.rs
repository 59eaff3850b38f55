use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// What a transcript entry represents. User entries are always `Reply`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Reply,
    Error,
    Notice,
}

/// Where a displayed value came from. `Synthetic` values are local
/// placeholders, not measurements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Backend,
    Synthetic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
    pub percent: u32,
    pub origin: Origin,
}

impl Confidence {
    pub fn reported(percent: u32) -> Self {
        Self { percent: percent.min(100), origin: Origin::Backend }
    }

    pub fn synthetic(percent: u32) -> Self {
        Self { percent: percent.min(100), origin: Origin::Synthetic }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceMatch {
    pub name: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub confidence: Confidence,
    pub documents_retrieved: u64,
    pub source: String,
    pub query: String,
    pub retrieved_documents: Option<Vec<SourceMatch>>,
    pub response_time_ms: u64,
}

impl ResponseMetadata {
    /// One-line quality summary shown under a bot reply.
    pub fn summary_line(&self) -> String {
        let marker = if self.confidence.is_synthetic() { " (estimated)" } else { "" };
        let noun = if self.documents_retrieved == 1 { "document" } else { "documents" };
        format!(
            "Confidence: {}%{} | Retrieved {} relevant {} | Source: {} | {}ms",
            self.confidence.percent,
            marker,
            self.documents_retrieved,
            noun,
            self.source,
            self.response_time_ms
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<ResponseMetadata>,
}

impl Message {
    fn new(sender: Sender, kind: MessageKind, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            kind,
            text,
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageKind::Reply, text.into())
    }

    pub fn bot_reply(text: impl Into<String>, metadata: ResponseMetadata) -> Self {
        let mut message = Self::new(Sender::Bot, MessageKind::Reply, text.into());
        message.metadata = Some(metadata);
        message
    }

    pub fn bot_error(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, MessageKind::Error, text.into())
    }

    pub fn bot_notice(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, MessageKind::Notice, text.into())
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}
