//! Local stand-in used when no model credential is configured.
//!
//! Replies follow the persona's arc loosely: a few short getting-to-know-you
//! questions first, then small forest sayings in rotation. Deterministic, so
//! the whole app can be exercised without a network.

use simulation::time_of_day::TimeCategory;

use crate::context::split_context;
use crate::error::ConversationError;
use crate::greeting::greeting_for;
use crate::session::ConversationSession;

const ENCOUNTER: [&str; 3] = [
    "You came a long way. Are you hungry?",
    "Do you walk far from your village every day?",
    "Hm. Sit a while. The ground is warm here.",
];

const SAYINGS: [&str; 5] = [
    "The peccary runs only when it is chased. Maybe nothing is chasing you.",
    "Fruit does not ripen faster because you look at it.",
    "A lone hunter goes hungry. Who walks with you?",
    "The river moves its path when stones block it. It does not argue with the stones.",
    "Listen. The frogs are talking. Things that are alive are never quiet.",
];

#[derive(Debug, Default, Clone)]
pub struct OfflineSession {
    turns: usize,
}

impl OfflineSession {
    pub fn turns(&self) -> usize {
        self.turns
    }

    fn line_for(&self, turn: usize) -> &'static str {
        match ENCOUNTER.get(turn) {
            Some(line) => *line,
            None => SAYINGS[(turn - ENCOUNTER.len()) % SAYINGS.len()],
        }
    }
}

impl ConversationSession for OfflineSession {
    fn start(&mut self, category: TimeCategory) -> Result<String, ConversationError> {
        self.turns = 0;
        Ok(greeting_for(category))
    }

    fn send(&mut self, text: &str) -> Result<String, ConversationError> {
        let (category, _words) = split_context(text);
        let line = self.line_for(self.turns);
        self.turns += 1;
        Ok(match category {
            Some(TimeCategory::Night) => format!("It is dark. Speak softly. {line}"),
            _ => line.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
