//! Character-by-character reveal of persona messages.
//!
//! Each persona message starts revealing the first frame it is seen and
//! gains one character per [`CHAR_INTERVAL`]. Player messages are never
//! animated.

use std::time::Duration;

use bevy::prelude::*;
use bevy::utils::HashMap;

use conversation::{ChatLog, Message, Sender};

pub const CHAR_INTERVAL: Duration = Duration::from_millis(20);

/// How many characters of a `total`-character text are visible after
/// `elapsed`.
pub fn visible_chars(elapsed: Duration, total: usize) -> usize {
    let steps = elapsed.as_millis() / CHAR_INTERVAL.as_millis();
    usize::try_from(steps).unwrap_or(usize::MAX).min(total)
}

/// The revealed prefix of `text`, cut on a character boundary.
pub fn reveal(text: &str, elapsed: Duration) -> &str {
    let shown = visible_chars(elapsed, text.chars().count());
    match text.char_indices().nth(shown) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// When each persona message was first seen.
#[derive(Resource, Debug, Default)]
pub struct TypewriterState {
    started: HashMap<u64, Duration>,
}

impl TypewriterState {
    pub fn begin(&mut self, id: u64, now: Duration) {
        self.started.entry(id).or_insert(now);
    }

    /// Text to draw for `message` at `now`.
    pub fn visible<'a>(&self, message: &'a Message, now: Duration) -> &'a str {
        if message.sender == Sender::User {
            return &message.text;
        }
        match self.started.get(&message.id) {
            Some(start) => reveal(&message.text, now.saturating_sub(*start)),
            None => "",
        }
    }

    pub fn is_done(&self, message: &Message, now: Duration) -> bool {
        self.visible(message, now).len() == message.text.len()
    }
}

pub fn track_reveals(time: Res<Time>, chat: Res<ChatLog>, mut state: ResMut<TypewriterState>) {
    if !chat.is_changed() {
        return;
    }
    let now = time.elapsed();
    for message in chat.transcript.messages() {
        if message.sender == Sender::Persona {
            state.begin(message.id, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use conversation::Transcript;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_one_char_per_interval() {
        assert_eq!(visible_chars(ms(0), 10), 0);
        assert_eq!(visible_chars(ms(19), 10), 0);
        assert_eq!(visible_chars(ms(20), 10), 1);
        assert_eq!(visible_chars(ms(99), 10), 4);
        assert_eq!(visible_chars(ms(10_000), 10), 10);
    }

    #[test]
    fn test_reveal_is_monotonic_and_ends_full() {
        let text = "Tiló! The river changes path.";
        let mut previous = 0;
        for t in (0..1_000).step_by(7) {
            let shown = reveal(text, ms(t));
            assert!(text.starts_with(shown));
            assert!(shown.len() >= previous);
            previous = shown.len();
        }
        assert_eq!(reveal(text, ms(1_000)), text);
    }

    #[test]
    fn test_reveal_respects_multibyte_chars() {
        // "AWÁ" is three characters but four bytes.
        assert_eq!(reveal("AWÁ", ms(40)), "AW");
        assert_eq!(reveal("AWÁ", ms(60)), "AWÁ");
    }

    #[test]
    fn test_state_reveals_persona_only() {
        let mut transcript = Transcript::default();
        transcript.push(Sender::User, "hello");
        transcript.push(Sender::Persona, "Are you hungry?");
        let user = &transcript.messages()[0];
        let persona = &transcript.messages()[1];

        let mut state = TypewriterState::default();
        assert_eq!(state.visible(user, ms(0)), "hello");
        assert_eq!(state.visible(persona, ms(0)), "");

        state.begin(persona.id, ms(1_000));
        assert_eq!(state.visible(persona, ms(1_060)), "Are");
        // A second begin does not restart the reveal.
        state.begin(persona.id, ms(1_060));
        assert_eq!(state.visible(persona, ms(1_080)), "Are ");
        assert!(!state.is_done(persona, ms(1_080)));
        assert!(state.is_done(persona, ms(5_000)));
    }
}
