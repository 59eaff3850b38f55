use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the RAG backend (e.g., http://localhost:8000)
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000")]
    pub backend_url: String,

    /// Route of the chat endpoint, relative to the backend URL.
    #[arg(long, env = "CHAT_ROUTE", default_value = "/api/chat")]
    pub chat_route: String,

    /// Route of the single-file upload endpoint.
    #[arg(long, env = "UPLOAD_ROUTE", default_value = "/api/upload-document")]
    pub upload_route: String,

    /// Route of the backend metrics summary endpoint.
    #[arg(long, env = "METRICS_ROUTE", default_value = "/api/metrics")]
    pub metrics_route: String,

    /// Route of the backend document count endpoint.
    #[arg(long, env = "DOCUMENTS_ROUTE", default_value = "/api/documents")]
    pub documents_route: String,

    /// Route probed once at startup to check the backend is reachable.
    #[arg(long, env = "HEALTH_ROUTE", default_value = "/api")]
    pub health_route: String,

    // --- Response Metadata Args ---
    /// Source label shown when the backend does not name one.
    #[arg(long, env = "DEFAULT_SOURCE", default_value = "Travel Knowledge Base")]
    pub default_source: String,

    // --- Placeholder Value Args ---
    /// Lower bound (inclusive) of the placeholder confidence used when the backend omits one.
    #[arg(long, env = "SYNTHETIC_CONFIDENCE_MIN", default_value = "85")]
    pub synthetic_confidence_min: u32,

    /// Upper bound (inclusive) of the placeholder confidence.
    #[arg(long, env = "SYNTHETIC_CONFIDENCE_MAX", default_value = "94")]
    pub synthetic_confidence_max: u32,

    /// Lower bound (inclusive) of the placeholder retrieval processing time, in ms.
    #[arg(long, env = "SYNTHETIC_PROCESSING_MIN_MS", default_value = "120")]
    pub synthetic_processing_min_ms: u64,

    /// Upper bound (inclusive) of the placeholder retrieval processing time, in ms.
    #[arg(long, env = "SYNTHETIC_PROCESSING_MAX_MS", default_value = "480")]
    pub synthetic_processing_max_ms: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Skip the startup reachability probe.
    #[arg(long, env = "SKIP_HEALTH_CHECK", default_value = "false")]
    pub skip_health_check: bool,
}
