use super::engine::{ProgressSender, RecognitionEngine};
use crate::error::EngineError;
use crate::models::artifact::MediaType;
use crate::models::config::EngineConfig;
use crate::models::job::EngineStatus;
use crate::models::language::Language;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP recognition engine that talks to a local OCR server
#[derive(Clone)]
pub struct HttpRecognitionEngine {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    image_base64: String,
    media_type: &'a str,
    lang: &'a str,
}

/// One line of the server's NDJSON response
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
enum ServerMessage {
    Text { text: String },
    Error { error: String },
    Status(EngineStatus),
}

impl HttpRecognitionEngine {
    /// Create a new HTTP engine client
    pub fn new(config: &EngineConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if server is healthy
    pub async fn health_check(&self) -> Result<(), EngineError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(EngineError::Server {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Parse one NDJSON line. Blank lines yield `None`.
    fn parse_line(line: &[u8]) -> Result<Option<ServerMessage>, EngineError> {
        let line = std::str::from_utf8(line)
            .map_err(|e| EngineError::Protocol(format!("Invalid UTF-8 in response: {}", e)))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(line)
            .map(Some)
            .map_err(|e| EngineError::Protocol(format!("Failed to parse '{}': {}", line, e)))
    }

    /// Apply one parsed message. Returns the text once the final message arrives.
    fn handle_message(
        message: ServerMessage,
        progress: &ProgressSender,
    ) -> Result<Option<String>, EngineError> {
        match message {
            ServerMessage::Status(status) => {
                progress.send(status).ok();
                Ok(None)
            }
            ServerMessage::Text { text } => Ok(Some(text)),
            ServerMessage::Error { error } => Err(EngineError::Engine(error)),
        }
    }
}

#[async_trait]
impl RecognitionEngine for HttpRecognitionEngine {
    async fn recognize(
        &self,
        payload: &[u8],
        media_type: MediaType,
        language: Language,
        progress: ProgressSender,
    ) -> Result<String, EngineError> {
        let url = format!("{}/ocr", self.base_url);
        let request = RecognizeRequest {
            image_base64: general_purpose::STANDARD.encode(payload),
            media_type: media_type.mime(),
            lang: language.code(),
        };

        let mut response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EngineError::Server { status, body });
        }

        // Lines may span chunk boundaries
        let mut pending: Vec<u8> = Vec::new();
        let mut text: Option<String> = None;

        while let Some(chunk) = response.chunk().await? {
            pending.extend_from_slice(&chunk);

            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                if let Some(message) = Self::parse_line(&line[..line.len() - 1])? {
                    if let Some(result) = Self::handle_message(message, &progress)? {
                        text = Some(result);
                    }
                }
            }
        }

        if let Some(message) = Self::parse_line(&pending)? {
            if let Some(result) = Self::handle_message(message, &progress)? {
                text = Some(result);
            }
        }

        text.ok_or_else(|| EngineError::Protocol("Response ended without text".to_string()))
    }
}
