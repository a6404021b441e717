//! Hidden time-of-day context prepended to every outgoing user turn.
//!
//! The tag is sent to the model but never shown in the transcript.

use simulation::time_of_day::TimeCategory;

const TAG_OPEN: &str = "[CONTEXT: It is currently ";
const TAG_CLOSE: &str =
    " in the forest. React to the time if relevant (light, temperature, tiredness).] ";

pub fn context_tag(category: TimeCategory) -> String {
    format!("{TAG_OPEN}{}{TAG_CLOSE}", category.label())
}

/// `text` as the model should receive it.
pub fn with_context(category: TimeCategory, text: &str) -> String {
    let mut out = context_tag(category);
    out.push_str(text);
    out
}

/// Split a tagged turn back into its category and the user's own words.
/// Untagged text comes back unchanged with no category.
pub fn split_context(turn: &str) -> (Option<TimeCategory>, &str) {
    let Some(rest) = turn.strip_prefix(TAG_OPEN) else {
        return (None, turn);
    };
    for category in TimeCategory::ALL {
        if let Some(body) = rest
            .strip_prefix(category.label())
            .and_then(|r| r.strip_prefix(TAG_CLOSE))
        {
            return (Some(category), body);
        }
    }
    (None, turn)
}
