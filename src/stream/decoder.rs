use tracing::debug;

use crate::protocol::parse::parse_line;
use crate::protocol::types::ResponseFragment;

/// What the decoder made of one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A well-formed envelope. `is_final` marks the end of the response.
    Fragment(ResponseFragment),
    /// Blank line, keep-alive, or anything that isn't a generate envelope.
    Skip,
}

/// Per-request line decoder.
///
/// Tracks whether the terminating `done: true` envelope has been seen; once
/// it has, the caller must stop feeding lines.
#[derive(Debug, Default)]
pub struct LineDecoder {
    finished: bool,
    skipped: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next line from the stream source.
    pub fn decode(&mut self, line: &str) -> LineOutcome {
        match parse_line(line) {
            Ok(Some(chunk)) => {
                let fragment = ResponseFragment::from(chunk);
                if fragment.is_final {
                    self.finished = true;
                }
                LineOutcome::Fragment(fragment)
            }
            Ok(None) => LineOutcome::Skip,
            Err(e) => {
                self.skipped += 1;
                debug!(error = %e, line, "skipping malformed stream line");
                LineOutcome::Skip
            }
        }
    }

    /// Whether a `done: true` envelope has been decoded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of non-blank lines that failed to parse.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fragment() {
        let mut decoder = LineDecoder::new();
        let outcome = decoder.decode(r#"{"response":"Hi","done":false}"#);
        assert_eq!(
            outcome,
            LineOutcome::Fragment(ResponseFragment {
                model_text: "Hi".into(),
                is_final: false,
            })
        );
        assert!(!decoder.is_finished());
    }

    #[test]
    fn done_marks_finished() {
        let mut decoder = LineDecoder::new();
        decoder.decode(r#"{"response":"","done":true}"#);
        assert!(decoder.is_finished());
    }

    #[test]
    fn blank_and_garbage_are_skipped() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.decode(""), LineOutcome::Skip);
        assert_eq!(decoder.decode("   "), LineOutcome::Skip);
        assert_eq!(decoder.decode("{not json"), LineOutcome::Skip);
        assert_eq!(decoder.decode(r#"{"status":"ping"}"#), LineOutcome::Skip);
        assert_eq!(decoder.skipped(), 2);
        assert!(!decoder.is_finished());
    }
}
