pub mod aggregator;
pub mod decoder;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::TransportError;
use aggregator::Aggregator;
use decoder::{LineDecoder, LineOutcome};

/// How a streamed response ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    /// The stream finished (via `done: true` or end-of-stream) with this text.
    Complete(String),
    /// Reading was cancelled; the partial text has been discarded.
    Cancelled,
}

/// Feed one line through the decoder into the aggregator.
///
/// Returns `true` once the terminating envelope has been seen.
fn feed(decoder: &mut LineDecoder, aggregator: &mut Aggregator, line: &str) -> bool {
    match decoder.decode(line) {
        LineOutcome::Fragment(fragment) => {
            aggregator.push(&fragment);
            fragment.is_final
        }
        LineOutcome::Skip => false,
    }
}

/// Aggregate an already-available sequence of lines (recorded streams, tests).
///
/// Stops at the first `done: true` envelope; lines after it are not read.
pub fn collect_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut decoder = LineDecoder::new();
    let mut aggregator = Aggregator::new();
    for line in lines {
        if feed(&mut decoder, &mut aggregator, line) {
            break;
        }
    }
    aggregator.finish()
}

/// Read a live line stream to completion, publishing progress through `aggregator`.
///
/// End-of-stream without a `done: true` envelope is a normal completion.
/// A transport error mid-stream aborts the request and drops the partial text.
pub async fn collect_stream<S>(
    mut lines: S,
    mut aggregator: Aggregator,
    cancel: &CancellationToken,
) -> Result<Collected, TransportError>
where
    S: Stream<Item = Result<String, TransportError>> + Unpin,
{
    let mut decoder = LineDecoder::new();
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(fragments = aggregator.fragment_count(), "stream cancelled");
                return Ok(Collected::Cancelled);
            }
            next = lines.next() => next,
        };
        let Some(line) = next else {
            break;
        };
        if feed(&mut decoder, &mut aggregator, &line?) {
            break;
        }
    }
    debug!(
        fragments = aggregator.fragment_count(),
        skipped = decoder.skipped(),
        terminated = decoder.is_finished(),
        "stream complete"
    );
    Ok(Collected::Complete(aggregator.finish()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures::stream;
    use tokio::sync::watch;

    fn ok_lines(lines: &[&str]) -> impl Stream<Item = Result<String, TransportError>> + Unpin {
        stream::iter(
            lines
                .iter()
                .map(|l| Ok(l.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn stops_at_done() {
        let text = collect_lines([
            r#"{"response":"a","done":false}"#,
            r#"{"response":"b","done":true}"#,
            r#"{"response":"c","done":false}"#,
        ]);
        assert_eq!(text, "ab");
    }

    #[test]
    fn garbage_lines_are_lossless() {
        let clean = [
            r#"{"response":"event-1\n","done":false}"#,
            r#"{"response":"title: Sync","done":false}"#,
            r#"{"response":"","done":true}"#,
        ];
        let noisy = [
            "",
            r#"{"response":"event-1\n","done":false}"#,
            "keep-alive",
            r#"{"oops":1}"#,
            r#"{"response":"title: Sync","done":false}"#,
            "   ",
            r#"{"response":"","done":true}"#,
        ];
        assert_eq!(collect_lines(clean), collect_lines(noisy));
    }

    #[test]
    fn end_without_done_is_complete() {
        let text = collect_lines([r#"{"response":"partial","done":false}"#]);
        assert_eq!(text, "partial");
    }

    #[tokio::test]
    async fn stream_collects_and_publishes() {
        let (tx, rx) = watch::channel(String::new());
        let lines = ok_lines(&[
            r#"{"response":"Sure, ","done":false}"#,
            r#"{"response":"how can I help?","done":true}"#,
        ]);
        let out = collect_stream(lines, Aggregator::with_observer(tx), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, Collected::Complete("Sure, how can I help?".into()));
        assert_eq!(*rx.borrow(), "Sure, how can I help?");
    }

    #[tokio::test]
    async fn stream_transport_error_propagates() {
        let lines = stream::iter(vec![
            Ok(r#"{"response":"a","done":false}"#.to_string()),
            Err(TransportError::Body("connection reset".into())),
        ]);
        let err = collect_stream(lines, Aggregator::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Body(_)));
    }

    #[tokio::test]
    async fn cancelled_stream_discards_text() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let lines = ok_lines(&[r#"{"response":"a","done":true}"#]);
        let out = collect_stream(lines, Aggregator::new(), &cancel).await.unwrap();
        assert_eq!(out, Collected::Cancelled);
    }

    #[tokio::test]
    async fn cancel_after_fragments_discards_text() {
        let (tx, mut rx) = watch::channel(String::new());
        let lines = ok_lines(&[r#"{"response":"event-1\n","done":false}"#])
            .chain(stream::pending::<Result<String, TransportError>>());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            rx.changed().await.unwrap();
            trigger.cancel();
        });
        let out = collect_stream(lines, Aggregator::with_observer(tx), &cancel)
            .await
            .unwrap();
        assert_eq!(out, Collected::Cancelled);
    }
}
