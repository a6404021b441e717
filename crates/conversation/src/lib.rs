//! Conversation with the forest persona.
//!
//! All conversational intelligence lives behind [`ConversationSession`]: the
//! Gemini client when a credential is configured, a deterministic offline
//! stand-in otherwise. This crate adds what the app needs around it: the
//! hidden time-of-day context, the opening greeting, the transcript, and the
//! Bevy plumbing that keeps blocking calls off the main thread.

pub mod context;
pub mod error;
pub mod gemini;
pub mod greeting;
pub mod offline;
pub mod plugin;
pub mod session;
pub mod transcript;

pub use error::ConversationError;
pub use gemini::{GeminiConfig, GeminiSession};
pub use offline::OfflineSession;
pub use plugin::{ActiveSession, ChatLog, ConversationPlugin, SendTurn, StartConversation};
pub use session::{ConversationSession, EMPTY_REPLY, FALLBACK_REPLY};
pub use transcript::{Message, Sender, Transcript};
