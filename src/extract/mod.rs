//! Turning aggregated model output into calendar events.
//!
//! `classify` decides whether the text is event data at all, `parse` reads it
//! under whichever syntax it arrived in, and `format` writes the canonical
//! block back out.

pub mod classify;
pub mod format;
pub mod parse;
pub mod types;

pub use classify::is_event_bearing;
pub use format::{NO_EVENTS_FOUND, format_event_block};
pub use parse::extract_events;
pub use types::{CalendarEvent, EventExtractionResult};
