use crate::error::SessionError;
use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use std::path::Path;

/// A file accepted by the backend. Built from what the client knows about
/// the file, never from the backend's echo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn from_upload(file: &UploadFile) -> Self {
        Self {
            name: file.name.clone(),
            size_bytes: file.size_bytes(),
            mime_type: file.mime_type.clone(),
            uploaded_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_for_name(&name).map(str::to_string);
        Self { name, content, mime_type }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SessionError::InvalidPath(path.display().to_string()))?
            .to_string();
        let content = tokio::fs
            ::read(path).await
            .map_err(|e| SessionError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(name, content))
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
}

/// MIME type for the document formats the backend knows how to ingest.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => {
            return None;
        }
    };
    Some(mime)
}
