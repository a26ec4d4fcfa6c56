use chrono::NaiveDate;
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{SessionState, SessionStatus, TurnOutcome};
use crate::client::StreamSource;
use crate::error::TransportError;
use crate::extract::{extract_events, format_event_block, is_event_bearing};
use crate::prompt::{build_prompt, reference_date};
use crate::stream::aggregator::Aggregator;
use crate::stream::{Collected, collect_stream};

/// Decide what a fully aggregated reply is.
pub fn classify_response(raw: String) -> TurnOutcome {
    if is_event_bearing(&raw) {
        let result = extract_events(&raw);
        TurnOutcome::Events { raw, result }
    } else {
        TurnOutcome::Message(raw)
    }
}

/// One conversation with the generator.
///
/// Every turn takes `&mut self`, so two turns can never share a buffer.
pub struct Session<S> {
    source: S,
    timezone: Tz,
    reference_date: Option<NaiveDate>,
    live: watch::Sender<String>,
    state: SessionState,
}

impl<S: StreamSource> Session<S> {
    pub fn new(source: S, timezone: Tz) -> Self {
        let (live, _) = watch::channel(String::new());
        Self {
            source,
            timezone,
            reference_date: None,
            live,
            state: SessionState::default(),
        }
    }

    /// Pin the reference date instead of using today in the session timezone.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Watch the reply text as it streams in. Read-only.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.live.subscribe()
    }

    /// Send a message and classify the reply as events or plain text.
    pub async fn send(
        &mut self,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, TransportError> {
        match self.stream_turn(user_text, cancel).await? {
            Collected::Complete(raw) => Ok(classify_response(raw)),
            Collected::Cancelled => Ok(TurnOutcome::Cancelled),
        }
    }

    /// Send a message and always run extraction, returning the formatted block
    /// or the no-events sentinel. `None` means the turn was cancelled.
    pub async fn parse_event(
        &mut self,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, TransportError> {
        match self.stream_turn(user_text, cancel).await? {
            Collected::Complete(raw) => Ok(Some(format_event_block(&extract_events(&raw)))),
            Collected::Cancelled => Ok(None),
        }
    }

    async fn stream_turn(
        &mut self,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> Result<Collected, TransportError> {
        let date = self
            .reference_date
            .unwrap_or_else(|| reference_date(self.timezone));
        let prompt = build_prompt(user_text, date, self.timezone.name())
            .map_err(|e| TransportError::Request(format!("{e:#}")))?;

        self.live.send_replace(String::new());
        self.state.status = SessionStatus::Streaming;
        info!(turn = self.state.turns + 1, chars = user_text.len(), %date, "starting turn");

        let result = match self.source.open(&prompt).await {
            Ok(lines) => {
                collect_stream(lines, Aggregator::with_observer(self.live.clone()), cancel).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(Collected::Complete(raw)) => {
                self.state.status = SessionStatus::Completed;
                self.state.turns += 1;
                debug!(bytes = raw.len(), "turn complete");
            }
            Ok(Collected::Cancelled) => {
                self.state.status = SessionStatus::Cancelled;
                self.live.send_replace(String::new());
            }
            Err(e) => {
                self.state.status = SessionStatus::Failed;
                self.live.send_replace(String::new());
                warn!(error = %e, "turn failed");
            }
        }
        result
    }
}
