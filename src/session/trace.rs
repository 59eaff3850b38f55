use crate::models::chat::{ Origin, SourceMatch };
use crate::session::synthetic::{ SyntheticPolicy, MAX_TOP_MATCHES };
use chrono::{ DateTime, Utc };
use serde::Serialize;

/// Latest explanation of which documents informed a reply. A new trace
/// replaces the previous one entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalTrace {
    pub query: String,
    pub documents_retrieved: u64,
    pub processing_time_ms: u64,
    pub processing_time_origin: Origin,
    pub top_matches: Vec<SourceMatch>,
    pub top_matches_origin: Origin,
    pub built_at: DateTime<Utc>,
}

/// Retrieval figures the backend reported for a turn, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportedRetrieval {
    pub processing_time_ms: Option<u64>,
    pub ranked_sources: Option<Vec<SourceMatch>>,
}

impl RetrievalTrace {
    /// Builds a trace for `query`, filling whatever the backend left out
    /// from `synthetic`. Simulated matches are named after `known_documents`.
    pub fn rebuild(
        query: &str,
        documents_retrieved: u64,
        reported: ReportedRetrieval,
        synthetic: &mut SyntheticPolicy,
        known_documents: &[String],
        source: &str
    ) -> Self {
        let (processing_time_ms, processing_time_origin) = match reported.processing_time_ms {
            Some(ms) => (ms, Origin::Backend),
            None => (synthetic.processing_time_ms(), Origin::Synthetic),
        };

        let (top_matches, top_matches_origin) = match reported.ranked_sources {
            Some(mut ranked) if !ranked.is_empty() => {
                ranked.truncate(MAX_TOP_MATCHES);
                (ranked, Origin::Backend)
            }
            _ =>
                (
                    synthetic.top_matches(documents_retrieved, known_documents, source),
                    Origin::Synthetic,
                ),
        };

        Self {
            query: query.to_string(),
            documents_retrieved,
            processing_time_ms,
            processing_time_origin,
            top_matches,
            top_matches_origin,
            built_at: Utc::now(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.processing_time_origin == Origin::Synthetic ||
            self.top_matches_origin == Origin::Synthetic
    }
}
