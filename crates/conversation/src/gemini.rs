//! Gemini `generateContent` client.
//!
//! The session keeps the running `contents` history itself and sends it in
//! full with every turn, alongside the persona's system instruction. A turn
//! that fails is removed from the history again so the next attempt starts
//! from the last good exchange.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use simulation::time_of_day::TimeCategory;

use crate::error::ConversationError;
use crate::greeting::greeting_for;
use crate::session::ConversationSession;

/// Persona prompt. Shipped as data so it can be edited without touching code.
pub const SYSTEM_INSTRUCTION: &str = include_str!("../persona/system_instruction.md");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.85,
            top_k: 40,
        }
    }
}

impl GeminiConfig {
    pub fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    pub fn user(text: &str) -> Self {
        Self::text(Some("user"), text)
    }

    pub fn model(text: &str) -> Self {
        Self::text(Some("model"), text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined. Empty if there is none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Carries one request to the model. Split out so sessions can be driven
/// without a network.
pub trait GeminiTransport: Send + 'static {
    fn generate(
        &self,
        url: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ConversationError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ConversationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl GeminiTransport for HttpTransport {
    fn generate(
        &self,
        url: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ConversationError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ConversationError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct GeminiSession<T: GeminiTransport = HttpTransport> {
    config: GeminiConfig,
    api_key: Option<String>,
    system_instruction: String,
    history: Vec<Content>,
    transport: T,
}

impl GeminiSession<HttpTransport> {
    pub fn new(config: GeminiConfig, api_key: Option<String>) -> Result<Self, ConversationError> {
        Ok(Self::with_transport(config, api_key, HttpTransport::new()?))
    }
}

impl<T: GeminiTransport> GeminiSession<T> {
    pub fn with_transport(config: GeminiConfig, api_key: Option<String>, transport: T) -> Self {
        Self {
            config,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            history: Vec::new(),
            transport,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn api_key(&self) -> Result<&str, ConversationError> {
        self.api_key
            .as_deref()
            .ok_or(ConversationError::MissingApiKey)
    }

    /// Request for the current history.
    pub fn request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::text(None, &self.system_instruction),
            contents: self.history.clone(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
            },
        }
    }
}

impl<T: GeminiTransport> ConversationSession for GeminiSession<T> {
    fn start(&mut self, category: TimeCategory) -> Result<String, ConversationError> {
        self.api_key()?;
        self.history.clear();
        info!("Gemini session started ({})", self.config.model);
        Ok(greeting_for(category))
    }

    fn send(&mut self, text: &str) -> Result<String, ConversationError> {
        let api_key = self.api_key()?.to_string();
        self.history.push(Content::user(text));

        let url = self.config.url();
        let outcome = self
            .transport
            .generate(&url, &api_key, &self.request())
            .and_then(|response| {
                let reply = response.text();
                if reply.trim().is_empty() {
                    Err(ConversationError::EmptyResponse)
                } else {
                    Ok(reply)
                }
            });

        match outcome {
            Ok(reply) => {
                self.history.push(Content::model(&reply));
                Ok(reply)
            }
            Err(err) => {
                self.history.pop();
                Err(err)
            }
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
