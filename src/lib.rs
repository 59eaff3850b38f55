pub mod backend;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod session;

use backend::HttpBackend;
use cli::Args;
use config::SessionConfig;
use log::{ info, warn };
use session::Session;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = SessionConfig::from_args(&args)?;

    info!("--- Session Configuration ---");
    info!("Backend URL: {}", config.backend.base_url);
    info!("Chat Endpoint: {}", config.backend.chat_url());
    info!("Upload Endpoint: {}", config.backend.upload_url());
    info!("Metrics Endpoint: {}", config.backend.metrics_url());
    info!("Documents Endpoint: {}", config.backend.documents_url());
    info!("Default Source: {}", config.default_source);
    info!(
        "Placeholder Confidence Band: {}..={}%",
        config.synthetic.confidence.start(),
        config.synthetic.confidence.end()
    );
    info!(
        "Placeholder Processing Band: {}..={}ms",
        config.synthetic.processing_time_ms.start(),
        config.synthetic.processing_time_ms.end()
    );
    info!("-----------------------------");

    let backend = Arc::new(HttpBackend::new(config.backend.clone()));
    let session = Session::new(backend, &config);

    if args.skip_health_check {
        info!("Skipping backend reachability check");
    } else {
        match session.check_backend().await {
            Ok(message) => info!("Backend reachable: {}", message),
            Err(e) => warn!("Backend at {} is not reachable yet: {}", config.backend.base_url, e),
        }
    }

    console::run_console(session).await
}
