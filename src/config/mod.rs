use crate::cli::Args;
use crate::error::ConfigError;
use std::ops::RangeInclusive;
use url::Url;

pub const DEFAULT_SOURCE: &str = "Travel Knowledge Base";
pub const DEFAULT_CONFIDENCE_BAND: RangeInclusive<u32> = 85..=94;
pub const DEFAULT_PROCESSING_BAND_MS: RangeInclusive<u64> = 120..=480;

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub chat_route: String,
    pub upload_route: String,
    pub metrics_route: String,
    pub documents_route: String,
    pub health_route: String,
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBackendUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBackendUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_route: "/api/chat".into(),
            upload_route: "/api/upload-document".into(),
            metrics_route: "/api/metrics".into(),
            documents_route: "/api/documents".into(),
            health_route: "/api".into(),
        })
    }

    pub fn endpoint(&self, route: &str) -> String {
        let route = route.trim();
        if route.starts_with('/') {
            format!("{}{}", self.base_url, route)
        } else {
            format!("{}/{}", self.base_url, route)
        }
    }

    pub fn chat_url(&self) -> String {
        self.endpoint(&self.chat_route)
    }

    pub fn upload_url(&self) -> String {
        self.endpoint(&self.upload_route)
    }

    pub fn metrics_url(&self) -> String {
        self.endpoint(&self.metrics_route)
    }

    pub fn documents_url(&self) -> String {
        self.endpoint(&self.documents_route)
    }

    pub fn health_url(&self) -> String {
        self.endpoint(&self.health_route)
    }
}

/// Bands for placeholder values used when the backend omits a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBands {
    pub confidence: RangeInclusive<u32>,
    pub processing_time_ms: RangeInclusive<u64>,
}

impl Default for SyntheticBands {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE_BAND,
            processing_time_ms: DEFAULT_PROCESSING_BAND_MS,
        }
    }
}

impl SyntheticBands {
    pub fn new(
        confidence: RangeInclusive<u32>,
        processing_time_ms: RangeInclusive<u64>
    ) -> Result<Self, ConfigError> {
        if confidence.is_empty() || *confidence.end() > 100 {
            return Err(ConfigError::InvalidBand {
                name: "confidence",
                min: *confidence.start() as u64,
                max: *confidence.end() as u64,
            });
        }
        if processing_time_ms.is_empty() {
            return Err(ConfigError::InvalidBand {
                name: "processing time",
                min: *processing_time_ms.start(),
                max: *processing_time_ms.end(),
            });
        }
        Ok(Self { confidence, processing_time_ms })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub backend: BackendConfig,
    pub default_source: String,
    pub synthetic: SyntheticBands,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8000".into(),
                chat_route: "/api/chat".into(),
                upload_route: "/api/upload-document".into(),
                metrics_route: "/api/metrics".into(),
                documents_route: "/api/documents".into(),
                health_route: "/api".into(),
            },
            default_source: DEFAULT_SOURCE.into(),
            synthetic: SyntheticBands::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut backend = BackendConfig::new(&args.backend_url)?;
        backend.chat_route = args.chat_route.clone();
        backend.upload_route = args.upload_route.clone();
        backend.metrics_route = args.metrics_route.clone();
        backend.documents_route = args.documents_route.clone();
        backend.health_route = args.health_route.clone();

        let synthetic = SyntheticBands::new(
            args.synthetic_confidence_min..=args.synthetic_confidence_max,
            args.synthetic_processing_min_ms..=args.synthetic_processing_max_ms
        )?;

        let default_source = if args.default_source.trim().is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            args.default_source.clone()
        };

        Ok(Self { backend, default_source, synthetic })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_endpoint_joins_routes() {
        let backend = BackendConfig::new("http://localhost:8000/").unwrap();
        assert_eq!(backend.chat_url(), "http://localhost:8000/api/chat");
        assert_eq!(backend.endpoint("api/extra"), "http://localhost:8000/api/extra");
    }

    #[test]
    fn test_rejects_bad_backend_url() {
        assert!(matches!(
            BackendConfig::new("not a url"),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));
        assert!(matches!(
            BackendConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_or_out_of_range_bands() {
        assert!(SyntheticBands::new(94..=85, 1..=2).is_err());
        assert!(SyntheticBands::new(90..=101, 1..=2).is_err());
        assert!(SyntheticBands::new(85..=94, 10..=5).is_err());
        assert!(SyntheticBands::new(0..=0, 0..=0).is_ok());
    }

    #[test]
    fn test_from_args_defaults() {
        let args = Args::parse_from(["mindmate"]);
        let config = SessionConfig::from_args(&args).unwrap();
        assert_eq!(config.backend.upload_url(), "http://localhost:8000/api/upload-document");
        assert_eq!(config.default_source, DEFAULT_SOURCE);
        assert_eq!(config.synthetic, SyntheticBands::default());
    }

    #[test]
    fn test_from_args_overrides() {
        let args = Args::parse_from([
            "mindmate",
            "--backend-url",
            "https://rag.example.com",
            "--chat-route",
            "/v2/chat",
            "--synthetic-confidence-min",
            "60",
            "--synthetic-confidence-max",
            "70",
        ]);
        let config = SessionConfig::from_args(&args).unwrap();
        assert_eq!(config.backend.chat_url(), "https://rag.example.com/v2/chat");
        assert_eq!(config.synthetic.confidence, 60..=70);
    }
}
