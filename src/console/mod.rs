pub mod render;

use crate::models::document::UploadFile;
use crate::session::Session;

use futures::StreamExt;
use log::{ info, warn };
use std::error::Error;
use tokio::io::{ AsyncBufReadExt, BufReader };

const HELP: &str = "Commands:
  <text>               ask the travel assistant
  /upload <path>...    upload documents (one request per file, in order)
  /metrics             session metrics and the backend's summary
  /trace               last retrieval trace
  /docs                uploaded documents and the backend's document count
  /help                show this help
  /quit                leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Upload(Vec<String>),
    Metrics,
    Trace,
    Docs,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('/') {
            return Command::Chat(line.to_string());
        }
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        match name {
            "/upload" => Command::Upload(parts.map(str::to_string).collect()),
            "/metrics" => Command::Metrics,
            "/trace" => Command::Trace,
            "/docs" => Command::Docs,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Line-oriented driver: stdin lines become session calls, session events
/// are printed by a subscriber task.
pub async fn run_console(mut session: Session) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            for line in render::render_event(&event) {
                println!("{}", line);
            }
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Chat(text) => {
                session.set_pending_input(text);
                session.send_pending().await;
            }
            Command::Upload(paths) => {
                let files = load_files(&paths).await;
                if files.len() == paths.len() {
                    session.upload_files(&files).await;
                }
            }
            Command::Metrics => print_metrics(&session).await,
            Command::Trace => {
                match session.trace() {
                    Some(trace) => {
                        for line in render::render_trace(trace) {
                            println!("{}", line);
                        }
                    }
                    None => println!("trace › no retrieval yet"),
                }
            }
            Command::Docs => {
                for line in render::render_documents(session.manifest()) {
                    println!("{}", line);
                }
                match session.backend_document_count().await {
                    Ok(count) => println!("      backend holds {} chunk(s)", count),
                    Err(e) => warn!("Could not fetch backend document count: {}", e),
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {
                break;
            }
            Command::Unknown(name) => println!("Unknown command '{}'. Type /help.", name),
        }
    }

    info!("Session ended after {} turn(s)", session.metrics().turn_count());
    drop(session);
    printer.await?;
    Ok(())
}

// Reads every path up front; a batch with an unreadable file is not sent.
async fn load_files(paths: &[String]) -> Vec<UploadFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => println!("[error] {}", e),
        }
    }
    files
}

async fn print_metrics(session: &Session) {
    println!("{}", render::render_metrics(&session.metrics().snapshot()));
    match session.backend_metrics().await {
        Ok(summary) => {
            if let Some(total) = summary.total_queries_processed {
                println!(
                    "      backend: {} queries | avg {:.3}s | avg {:.2} documents | since {}",
                    total,
                    summary.average_response_time.unwrap_or_default(),
                    summary.average_documents_retrieved.unwrap_or_default(),
                    summary.tracking_since.as_deref().unwrap_or("unknown")
                );
            } else if let Some(message) = summary.message {
                println!("      backend: {}", message);
            }
        }
        Err(e) => warn!("Could not fetch backend metrics: {}", e),
    }
}
