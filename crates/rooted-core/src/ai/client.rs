//! Chat-completions client for the text/image generation endpoint.

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::error::{AiError, ConfigError};
use crate::storage::AiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    pub filename: String,
    /// `data:<mime>;base64,<payload>`
    pub file_data: String,
}

/// One element of a multimodal message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    File { file: FileData },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    /// Inline a file as a base64 data URL.
    pub fn file_from_bytes(filename: impl Into<String>, mime: &str, bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        ContentPart::File {
            file: FileData {
                filename: filename.into(),
                file_data: format!("data:{mime};base64,{encoded}"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Race `fut` against a deadline.
pub async fn with_timeout<T, F>(fut: F, timeout: Duration) -> Result<T, AiError>
where
    F: Future<Output = Result<T, AiError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AiError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Pull `choices[0].message.content` out of a completion body, or fall
/// back to the whole body rendered as JSON.
pub fn extract_content(body: &Value) -> String {
    match body.pointer("/choices/0/message/content") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        None | Some(Value::Null | Value::Bool(false) | Value::String(_)) => body.to_string(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    endpoint: Url,
    customer_id: Option<String>,
    api_key: Option<String>,
    chat_model: String,
    image_model: String,
    timeout: Duration,
}

impl AiClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: Client::new(),
            endpoint: config.endpoint_url()?,
            customer_id: Some(config.customer_id.clone()).filter(|c| !c.is_empty()),
            api_key: config.resolved_api_key(),
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a chat completion and return the reply text.
    ///
    /// `model` defaults to the configured chat model. A system prompt, when
    /// given, is prepended as the first message.
    pub async fn generate_chat_response(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Result<String, AiError> {
        let model = model.unwrap_or(&self.chat_model);
        let mut all = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = system_prompt {
            all.push(ChatMessage::system(prompt));
        }
        all.extend(messages);

        tracing::info!(model, messages = all.len(), "AI request");
        let result = with_timeout(self.post(json!({ "model": model, "messages": all })), self.timeout).await;
        if let Err(e) = &result {
            tracing::warn!(model, error = %e, "AI request failed");
        }
        result
    }

    /// Ask the image model for a picture. Returns whatever the endpoint
    /// replies with, typically a URL.
    pub async fn generate_image(&self, prompt: &str) -> Result<String, AiError> {
        let message = ChatMessage::user(format!("Generate an image: {prompt}"));
        self.generate_chat_response(vec![message], Some(self.image_model.as_str()), None)
            .await
    }

    async fn post(&self, payload: Value) -> Result<String, AiError> {
        let mut request = self.http.post(self.endpoint.clone()).json(&payload);
        if let Some(customer_id) = &self.customer_id {
            request = request.header("customerId", customer_id);
        }
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AiError::Status {
                status: status.as_u16(),
            });
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AiError::Decode(e.to_string()))?;
        Ok(extract_content(&body))
    }
}
