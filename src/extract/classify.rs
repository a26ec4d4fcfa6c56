use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

#[allow(clippy::expect_used)]
fn re_block_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"event-\d+\s+title:").expect("valid block header regex"))
}

/// The span from the first `{` to the last `}`, greedy across the whole text.
///
/// For text that is already a bare object this is the trimmed text itself.
pub(crate) fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// A JSON object with both `eventCount` and `events` keys. Values are not checked.
fn looks_like_event_json(text: &str) -> bool {
    let Some(candidate) = outermost_braces(text) else {
        return false;
    };
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => map.contains_key("eventCount") && map.contains_key("events"),
        _ => false,
    }
}

/// `event-<N>` followed by whitespace and a `title:` label, anywhere in the text.
fn looks_like_event_block(text: &str) -> bool {
    re_block_header().is_match(text)
}

/// Decide whether aggregated model output describes events or is a plain reply.
///
/// Anything that fails both checks is a conversational message, even if it
/// happens to contain event-like data in some other shape.
pub fn is_event_bearing(text: &str) -> bool {
    looks_like_event_json(text) || looks_like_event_block(text)
}
