use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use reqwest::multipart::{ Form, Part };

use super::{ BackendReply, RagBackend };
use crate::config::BackendConfig;
use crate::error::SessionError;
use crate::models::document::UploadFile;
use crate::models::wire::ChatRequest;

/// Multipart field the upload endpoint reads the file from.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: HttpClient,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    async fn into_reply(resp: reqwest::Response) -> Result<BackendReply, SessionError> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!("Backend replied with status {} ({} bytes)", status, body.len());
        Ok(BackendReply { status, body })
    }

    async fn get(&self, url: &str) -> Result<BackendReply, SessionError> {
        let resp = self.http.get(url).send().await?;
        Self::into_reply(resp).await
    }
}

#[async_trait]
impl RagBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<BackendReply, SessionError> {
        let url = self.config.chat_url();
        debug!("POST {}", url);
        let resp = self.http.post(&url).json(request).send().await?;
        Self::into_reply(resp).await
    }

    async fn upload(&self, file: &UploadFile) -> Result<BackendReply, SessionError> {
        let url = self.config.upload_url();
        debug!("POST {} ({}, {} bytes)", url, file.name, file.size_bytes());
        let mut part = Part::bytes(file.content.clone()).file_name(file.name.clone());
        if let Some(mime) = &file.mime_type {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);
        let resp = self.http.post(&url).multipart(form).send().await?;
        Self::into_reply(resp).await
    }

    async fn metrics_summary(&self) -> Result<BackendReply, SessionError> {
        self.get(&self.config.metrics_url()).await
    }

    async fn document_count(&self) -> Result<BackendReply, SessionError> {
        self.get(&self.config.documents_url()).await
    }

    async fn health(&self) -> Result<BackendReply, SessionError> {
        self.get(&self.config.health_url()).await
    }
}
