use serde::{Deserialize, Serialize};

/// A single calendar event.
///
/// Times are kept as the generator wrote them (`YYYY-MM-DD HH:MM[:SS]`);
/// consumers that need a temporal type parse them themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
}

/// Trim a field value and fold line breaks so it stays on one block line.
fn clean(value: &str) -> String {
    value
        .trim()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    value.map(clean).filter(|v| !v.is_empty())
}

/// Accumulates the fields of one candidate event from either input format.
#[derive(Debug, Default, Clone)]
pub struct EventBuilder {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub reminder: Option<String>,
}

impl EventBuilder {
    /// Materialize the event, or `None` if title, start or end is blank.
    pub fn build(self) -> Option<CalendarEvent> {
        let title = clean_optional(self.title.as_deref())?;
        let start_time = clean_optional(self.start_time.as_deref())?;
        let end_time = clean_optional(self.end_time.as_deref())?;
        Some(CalendarEvent {
            title,
            start_time,
            end_time,
            location: clean_optional(self.location.as_deref()),
            notes: clean_optional(self.notes.as_deref()),
            reminder: clean_optional(self.reminder.as_deref()),
        })
    }
}

/// The events found in one response.
///
/// The count is always derived from the list; a count supplied by the
/// generator is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventExtractionResult {
    events: Vec<CalendarEvent>,
    event_count: usize,
}

impl EventExtractionResult {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        let event_count = events.len();
        Self {
            events,
            event_count,
        }
    }

    /// The canonical empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// JSON shape accepted from the generator. `eventCount` is deliberately not
/// read.
#[derive(Debug, Deserialize)]
pub(crate) struct RawExtraction {
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reminder: Option<String>,
}

impl From<RawEvent> for EventBuilder {
    fn from(raw: RawEvent) -> Self {
        Self {
            title: raw.title,
            start_time: raw.start_time,
            end_time: raw.end_time,
            location: raw.location,
            notes: raw.notes,
            reminder: raw.reminder,
        }
    }
}

impl RawExtraction {
    /// Keep only complete events and recount.
    pub fn into_result(self) -> EventExtractionResult {
        EventExtractionResult::new(
            self.events
                .into_iter()
                .filter_map(|raw| EventBuilder::from(raw).build())
                .collect(),
        )
    }
}
