use std::fmt::Write as _;

use super::types::EventExtractionResult;

/// Shown instead of a block when nothing was extracted. Not event data.
pub const NO_EVENTS_FOUND: &str = "No events found";

/// Render events in the labeled block syntax that the text-block parser reads.
///
/// Headers are renumbered from `event-1`. `location` and `notes` lines are
/// left out when absent.
pub fn format_event_block(result: &EventExtractionResult) -> String {
    if result.event_count() == 0 {
        return NO_EVENTS_FOUND.to_string();
    }

    let mut out = String::new();
    for (i, event) in result.events().iter().enumerate() {
        let _ = writeln!(out, "event-{}", i + 1);
        let _ = writeln!(out, " title: {}", event.title);
        let _ = writeln!(out, " start: {}", event.start_time);
        let _ = writeln!(out, " end: {}", event.end_time);
        if let Some(ref location) = event.location {
            let _ = writeln!(out, " location: {location}");
        }
        if let Some(ref notes) = event.notes {
            let _ = writeln!(out, " notes: {notes}");
        }
    }
    out
}
