use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::classify::outermost_braces;
use super::types::{EventBuilder, EventExtractionResult, RawExtraction};

#[allow(clippy::expect_used)]
fn re_block_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"event-\d+").expect("valid block marker regex"))
}

/// One way of reading events out of model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStrategy {
    /// The whole trimmed text is the JSON object.
    DirectJson,
    /// The JSON object is surrounded by prose; parse the outermost `{...}`.
    EmbeddedJson,
    /// `event-N` headers followed by `title:`/`start:`/`end:` lines.
    TextBlock,
}

/// Attempt order. The first strategy that yields events wins.
pub const STRATEGIES: [FormatStrategy; 3] = [
    FormatStrategy::DirectJson,
    FormatStrategy::EmbeddedJson,
    FormatStrategy::TextBlock,
];

/// Why a strategy produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatMiss {
    /// The text doesn't have the shape this strategy reads.
    NotApplicable,
    /// The shape was right but decoding failed.
    Malformed(String),
    /// Decoded cleanly but no complete event survived.
    NoEvents,
}

impl FormatStrategy {
    pub fn name(self) -> &'static str {
        match self {
            FormatStrategy::DirectJson => "direct-json",
            FormatStrategy::EmbeddedJson => "embedded-json",
            FormatStrategy::TextBlock => "text-block",
        }
    }

    pub fn attempt(self, text: &str) -> Result<EventExtractionResult, FormatMiss> {
        let result = match self {
            FormatStrategy::DirectJson => parse_direct_json(text)?,
            FormatStrategy::EmbeddedJson => parse_embedded_json(text)?,
            FormatStrategy::TextBlock => parse_text_block(text),
        };
        if result.is_empty() {
            Err(FormatMiss::NoEvents)
        } else {
            Ok(result)
        }
    }
}

fn parse_json(candidate: &str) -> Result<EventExtractionResult, FormatMiss> {
    serde_json::from_str::<RawExtraction>(candidate)
        .map(RawExtraction::into_result)
        .map_err(|e| FormatMiss::Malformed(e.to_string()))
}

fn parse_direct_json(text: &str) -> Result<EventExtractionResult, FormatMiss> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return Err(FormatMiss::NotApplicable);
    }
    parse_json(trimmed)
}

fn parse_embedded_json(text: &str) -> Result<EventExtractionResult, FormatMiss> {
    match outermost_braces(text) {
        // Same span as the direct attempt; nothing new to try.
        Some(candidate) if candidate == text.trim() => Err(FormatMiss::NotApplicable),
        Some(candidate) => parse_json(candidate),
        None => Err(FormatMiss::NotApplicable),
    }
}

/// Read one `event-N` segment. The marker itself is stripped so an inline
/// `event-1 title: ...` still counts.
fn parse_segment(segment: &str) -> EventBuilder {
    let mut builder = EventBuilder::default();
    for line in segment.lines() {
        let line = line.trim();
        if let Some(v) = line.strip_prefix("title:") {
            builder.title = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("start:") {
            builder.start_time = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("end:") {
            builder.end_time = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("location:") {
            builder.location = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("notes:") {
            builder.notes = Some(v.trim().to_string());
        }
    }
    builder
}

/// Split at each `event-N` marker and keep the segments with title, start and end.
///
/// Text before the first marker is discarded. Incomplete segments are skipped.
pub fn parse_text_block(text: &str) -> EventExtractionResult {
    let markers: Vec<_> = re_block_marker().find_iter(text).collect();
    let mut events = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let end = markers.get(i + 1).map_or(text.len(), |next| next.start());
        let body = &text[marker.end()..end];
        match parse_segment(body).build() {
            Some(event) => events.push(event),
            None => debug!(marker = marker.as_str(), "dropping incomplete event segment"),
        }
    }
    EventExtractionResult::new(events)
}

/// Extract events from text already classified as event-bearing.
///
/// Never fails: every miss falls through to the next strategy and, after the
/// last one, to the empty result.
pub fn extract_events(text: &str) -> EventExtractionResult {
    for strategy in STRATEGIES {
        match strategy.attempt(text) {
            Ok(result) => {
                debug!(
                    strategy = strategy.name(),
                    events = result.event_count(),
                    "extracted events"
                );
                return result;
            }
            Err(miss) => debug!(strategy = strategy.name(), ?miss, "format strategy missed"),
        }
    }
    EventExtractionResult::empty()
}
