use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::extract::format::format_event_block;
use crate::extract::types::{CalendarEvent, EventExtractionResult};

const PROMPT_TEMPLATE: &str = "\
You are an event parser. From the given input, extract zero or more events. If there are no events, return nothing.
Irrelevant, non-event-related, or insufficiently detailed input should also return nothing.
If there is one or more events, output them in the exact format below with sequential numbering starting at event-1.
Do not add any extra text, explanations, or commentary.

REFERENCE_DATE: {{reference_date}}
TIMEZONE: {{timezone}}
OUTPUT FORMAT (exactly, no extra text):
{{output_format}}...

Input: {{input}}";

/// Two placeholder events in the same block syntax the parser reads back.
fn output_format_example() -> String {
    let placeholder = CalendarEvent {
        title: "<title>".into(),
        start_time: "<YYYY-MM-DD HH:MM:SS>".into(),
        end_time: "<YYYY-MM-DD HH:MM:SS>".into(),
        location: Some("<location or empty>".into()),
        notes: Some("<notes or empty>".into()),
        reminder: None,
    };
    format_event_block(&EventExtractionResult::new(vec![
        placeholder.clone(),
        placeholder,
    ]))
}

/// Today's date as seen from `tz`.
pub fn reference_date(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Build the instruction text sent to the generator.
///
/// Output depends only on the arguments.
pub fn build_prompt(input: &str, reference_date: NaiveDate, timezone: &str) -> Result<String> {
    let mut data = BTreeMap::new();
    data.insert("reference_date", reference_date.format("%Y-%m-%d").to_string());
    data.insert("timezone", timezone.to_string());
    data.insert("output_format", output_format_example());
    data.insert("input", input.to_string());

    let mut hbs = handlebars::Handlebars::new();
    hbs.set_strict_mode(true);
    hbs.register_escape_fn(handlebars::no_escape);
    hbs.render_template(PROMPT_TEMPLATE, &data)
        .context("failed to render extraction prompt")
}
