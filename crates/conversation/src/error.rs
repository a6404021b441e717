use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("no API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("remote model reply contained no text")]
    EmptyResponse,
    #[error("a turn is already in flight")]
    Busy,
}
