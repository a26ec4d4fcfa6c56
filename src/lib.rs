pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod protocol;
pub mod replay;
pub mod session;
pub mod stream;

use extract::{extract_events, format_event_block, is_event_bearing};

/// Render an aggregated reply for display.
///
/// Event-bearing text is reformatted into the canonical block (or the
/// no-events sentinel); anything else is returned unchanged.
pub fn render_response(raw: &str) -> String {
    if is_event_bearing(raw) {
        format_event_block(&extract_events(raw))
    } else {
        raw.to_string()
    }
}
