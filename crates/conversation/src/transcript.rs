//! Turn-by-turn record of the conversation as the player sees it.

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Persona,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "YOU",
            Sender::Persona => "AWÁ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    /// Two-digit hour and minute, e.g. `09:05`.
    pub fn stamp(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    /// Caption shown under the bubble: sender label and time.
    pub fn caption(&self) -> String {
        format!("{} • {}", self.sender.label(), self.stamp())
    }
}

/// Messages in the order they were added. Ids are unique and increasing.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        self.push_at(sender, text, Local::now())
    }

    pub fn push_at(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> &Message {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            sender,
            text: text.into(),
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
