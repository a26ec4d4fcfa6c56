use anyhow::Result;
use chrono::NaiveDate;
use futures::StreamExt;
use futures::stream;
use serde::Deserialize;

use crate::client::{LineStream, StreamSource};
use crate::error::TransportError;
use crate::prompt::build_prompt;

/// Recorded-case definition loaded from `tests/cases/<name>.toml`.
///
/// The matching `<name>.ndjson` holds the generator's raw reply to the
/// prompt this case builds.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    /// Text the user typed.
    pub input: String,
    /// Reference date pinned into the prompt so recordings are reproducible.
    pub reference_date: NaiveDate,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

impl TestCase {
    pub fn prompt(&self) -> Result<String> {
        build_prompt(&self.input, self.reference_date, &self.timezone)
    }
}

/// A recorded upstream response, replayed line by line.
///
/// Recordings are the raw NDJSON body the generator sent, so they may hold
/// keep-alives or broken lines exactly as they arrived.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    lines: Vec<String>,
    fail_with_status: Option<u16>,
}

impl ReplaySource {
    pub fn from_ndjson(body: &str) -> Self {
        Self {
            lines: body.lines().map(str::to_string).collect(),
            fail_with_status: None,
        }
    }

    /// Build a response carrying only the given fragments, the last one marked `done`.
    pub fn from_fragments(fragments: &[&str]) -> Self {
        let last = fragments.len().saturating_sub(1);
        let lines = fragments
            .iter()
            .enumerate()
            .map(|(i, text)| {
                serde_json::json!({ "response": text, "done": i == last }).to_string()
            })
            .collect();
        Self {
            lines,
            fail_with_status: None,
        }
    }

    /// A source whose request fails with a non-2xx status.
    pub fn failing(code: u16) -> Self {
        Self {
            lines: Vec::new(),
            fail_with_status: Some(code),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl StreamSource for ReplaySource {
    async fn open(&self, _prompt: &str) -> Result<LineStream, TransportError> {
        if let Some(code) = self.fail_with_status {
            return Err(TransportError::Status { code });
        }
        Ok(stream::iter(self.lines.clone().into_iter().map(Ok::<_, TransportError>)).boxed())
    }
}
