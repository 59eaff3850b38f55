use crate::models::chat::SourceMatch;
use serde::{ Serialize, Deserialize };
use serde_json::Value;
use std::path::Path;

pub const NO_RESPONSE_PLACEHOLDER: &str = "No response from server";

#[derive(Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ReplyMetadata {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub documents_retrieved: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub query: Option<String>,
    pub retrieved_documents: Option<Value>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub processing_time_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub response_time: Option<String>,
}

/// Chat reply body. The backend may put quality fields either inside
/// `metadata` or at the top level; `metadata` wins when both are present.
///
/// A quality field of the wrong type reads as absent. Only the reply text
/// decides whether a reply is usable.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_metadata")]
    pub metadata: Option<ReplyMetadata>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub documents_retrieved: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub response_time: Option<String>,
    pub retrieved_documents: Option<Value>,
}

mod lenient {
    use super::ReplyMetadata;
    use serde::{ Deserialize, Deserializer };
    use serde_json::Value;

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }.filter(|v| v.is_finite()))
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) =>
                n.as_u64().or_else(|| {
                    n.as_f64()
                        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                        .map(|v| v as u64)
                }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn opt_metadata<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ReplyMetadata>, D::Error> {
        Ok(match Value::deserialize(d)? {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }
}

/// Quality fields after merging `metadata` with the top-level fallbacks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplyFields {
    pub confidence: Option<f64>,
    pub documents_retrieved: Option<u64>,
    pub source: Option<String>,
    pub query: Option<String>,
    pub has_retrieval: bool,
    pub ranked_sources: Option<Vec<SourceMatch>>,
    pub processing_time_ms: Option<u64>,
}

impl ChatReply {
    /// `response`, else `message`. Empty strings count as missing.
    pub fn reply_text(&self) -> Option<&str> {
        self.response
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn fields(&self) -> ReplyFields {
        let meta = self.metadata.clone().unwrap_or_default();
        let retrieved = meta.retrieved_documents.as_ref().or(self.retrieved_documents.as_ref());
        let processing_time_ms = meta.processing_time_ms
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| ms.round() as u64)
            .or_else(|| meta.response_time.as_deref().and_then(parse_duration_ms))
            .or_else(|| self.response_time.as_deref().and_then(parse_duration_ms));

        ReplyFields {
            confidence: meta.confidence.or(self.confidence).filter(|c| c.is_finite()),
            documents_retrieved: meta.documents_retrieved.or(self.documents_retrieved),
            source: meta.source.or_else(|| self.source.clone()).filter(|s| !s.is_empty()),
            query: meta.query.or_else(|| self.query.clone()),
            has_retrieval: retrieved.is_some(),
            ranked_sources: retrieved.and_then(parse_ranked_sources),
            processing_time_ms,
        }
    }
}

/// Parses `"0.42s"`, `"420ms"` or a bare number of seconds into whole ms.
pub fn parse_duration_ms(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (number, scale) = if let Some(ms) = raw.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = raw.strip_suffix('s') {
        (s, 1000.0)
    } else {
        (raw, 1000.0)
    };
    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * scale).round() as u64)
}

/// Turns the backend's `retrieved_documents` list into ranked sources.
/// Returns `None` when the value is not a non-empty list.
pub fn parse_ranked_sources(value: &Value) -> Option<Vec<SourceMatch>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    let mut matches: Vec<SourceMatch> = items
        .iter()
        .enumerate()
        .map(|(i, item)| SourceMatch {
            name: source_name(item).unwrap_or_else(|| format!("Document {}", i + 1)),
            score: item
                .get("score")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        })
        .collect();
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Some(matches)
}

fn source_name(item: &Value) -> Option<String> {
    let meta = item.get("metadata");
    let candidates = [
        meta.and_then(|m| m.get("source")),
        meta.and_then(|m| m.get("filename")),
        item.get("name"),
        item.get("id"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(|s| {
            Path::new(s)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(s)
                .to_string()
        })
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct UploadReply {
    pub filename: Option<String>,
    pub message: Option<String>,
    pub detail: Option<Value>,
    pub chunks_created: Option<u64>,
}

impl UploadReply {
    /// Parses an upload body, substituting a placeholder when it is not JSON.
    pub fn parse_or_placeholder(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: Some(NO_RESPONSE_PLACEHOLDER.to_string()),
            ..Self::default()
        })
    }

    /// Most descriptive failure text available: `detail`, `message`, status.
    pub fn failure_reason(&self, status: u16) -> String {
        let detail = self.detail.as_ref().and_then(|d| match d {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        detail
            .or_else(|| self.message.clone().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| format!("Upload failed with status: {}", status))
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct BackendMetricsSummary {
    pub total_queries_processed: Option<u64>,
    pub average_response_time: Option<f64>,
    pub average_documents_retrieved: Option<f64>,
    pub tracking_since: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DocumentCountReply {
    pub document_count: u64,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct HealthReply {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(value: Value) -> ChatReply {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reply_text_prefers_response_over_message() {
        let r = reply(json!({"response": "Visit Kuta Beach", "message": "ignored"}));
        assert_eq!(r.reply_text(), Some("Visit Kuta Beach"));

        let r = reply(json!({"message": "fallback"}));
        assert_eq!(r.reply_text(), Some("fallback"));

        let r = reply(json!({"response": "", "message": ""}));
        assert_eq!(r.reply_text(), None);
    }

    #[test]
    fn test_fields_from_metadata() {
        let r = reply(json!({
            "response": "ok",
            "metadata": {"confidence": 91, "documents_retrieved": 3, "source": "Guides", "query": "bali"}
        }));
        let f = r.fields();
        assert_eq!(f.confidence, Some(91.0));
        assert_eq!(f.documents_retrieved, Some(3));
        assert_eq!(f.source.as_deref(), Some("Guides"));
        assert_eq!(f.query.as_deref(), Some("bali"));
        assert!(!f.has_retrieval);
    }

    #[test]
    fn test_fields_fall_back_to_top_level() {
        let r = reply(json!({
            "query": "hotels",
            "response": "ok",
            "confidence": 0.0,
            "documents_retrieved": 0,
            "response_time": "0.25s",
            "retrieved_documents": []
        }));
        let f = r.fields();
        assert_eq!(f.confidence, Some(0.0));
        assert!(f.has_retrieval);
        assert_eq!(f.ranked_sources, None);
        assert_eq!(f.processing_time_ms, Some(250));
    }

    #[test]
    fn test_mistyped_quality_fields_read_as_absent() {
        let r: ChatReply = serde_json::from_str(
            r#"{"response": "Visit Kuta", "confidence": {"v": 1}, "metadata": {"documents_retrieved": -1, "source": {"k": 1}, "query": ["x"]}}"#
        ).unwrap();
        assert_eq!(r.reply_text(), Some("Visit Kuta"));
        let f = r.fields();
        assert_eq!(f.confidence, None);
        assert_eq!(f.documents_retrieved, None);
        assert_eq!(f.source, None);
        assert_eq!(f.query, None);
    }

    #[test]
    fn test_loosely_typed_numbers_are_accepted() {
        let r = reply(json!({
            "response": "ok",
            "metadata": {"confidence": "91%", "documents_retrieved": 3.0, "response_time": 0.5}
        }));
        let f = r.fields();
        assert_eq!(f.confidence, Some(91.0));
        assert_eq!(f.documents_retrieved, Some(3));
        assert_eq!(f.processing_time_ms, Some(500));
    }

    #[test]
    fn test_non_object_metadata_is_ignored() {
        let r = reply(json!({"response": "ok", "metadata": "none", "source": "Top"}));
        assert!(r.metadata.is_none());
        assert_eq!(r.fields().source.as_deref(), Some("Top"));
    }

    #[test]
    fn test_ranked_sources_sorted_and_named() {
        let value = json!([
            {"id": "a", "score": 0.4, "metadata": {"source": "/uploads/hotels.pdf"}},
            {"id": "b", "score": 0.9, "metadata": {}},
            {"score": 0.6}
        ]);
        let sources = parse_ranked_sources(&value).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "Document 3", "hotels.pdf"]);
        assert_eq!(sources[0].score, 0.9);
    }

    #[test]
    fn test_parse_duration_ms_formats() {
        assert_eq!(parse_duration_ms("0.42s"), Some(420));
        assert_eq!(parse_duration_ms("85ms"), Some(85));
        assert_eq!(parse_duration_ms("1.5"), Some(1500));
        assert_eq!(parse_duration_ms("fast"), None);
        assert_eq!(parse_duration_ms("-1s"), None);
    }

    #[test]
    fn test_upload_reply_placeholder_on_unparseable_body() {
        let r = UploadReply::parse_or_placeholder("<html>502 Bad Gateway</html>");
        assert_eq!(r.message.as_deref(), Some(NO_RESPONSE_PLACEHOLDER));
        assert_eq!(r.failure_reason(502), NO_RESPONSE_PLACEHOLDER);
    }

    #[test]
    fn test_upload_failure_reason_priority() {
        let r = UploadReply::parse_or_placeholder(r#"{"detail": "corrupt file", "message": "nope"}"#);
        assert_eq!(r.failure_reason(400), "corrupt file");

        let r = UploadReply::parse_or_placeholder(r#"{"message": "too large"}"#);
        assert_eq!(r.failure_reason(413), "too large");

        let r = UploadReply::parse_or_placeholder("{}");
        assert_eq!(r.failure_reason(500), "Upload failed with status: 500");

        let r = UploadReply::parse_or_placeholder(r#"{"detail": [{"msg": "field required"}]}"#);
        assert!(r.failure_reason(422).contains("field required"));
    }
}
