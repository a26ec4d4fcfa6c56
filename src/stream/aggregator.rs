use tokio::sync::watch;

use crate::protocol::types::ResponseFragment;

/// Append-only buffer of fragment text for one request.
///
/// The aggregator is the single writer. Observers get a `watch::Receiver`
/// holding a copy of the text so far, never the buffer itself.
#[derive(Debug, Default)]
pub struct Aggregator {
    buffer: String,
    fragments: usize,
    observer: Option<watch::Sender<String>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator that publishes a snapshot after every fragment.
    pub fn with_observer(observer: watch::Sender<String>) -> Self {
        Self {
            observer: Some(observer),
            ..Self::default()
        }
    }

    /// Append a fragment verbatim, including empty text.
    pub fn push(&mut self, fragment: &ResponseFragment) {
        self.buffer.push_str(&fragment.model_text);
        self.fragments += 1;
        if let Some(ref tx) = self.observer {
            // No receivers is fine; the snapshot is best-effort.
            tx.send_replace(self.buffer.clone());
        }
    }

    /// Current aggregated text.
    pub fn current(&self) -> &str {
        &self.buffer
    }

    /// Number of fragments pushed so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Consume the aggregator and return the final text.
    pub fn finish(self) -> String {
        self.buffer
    }
}
