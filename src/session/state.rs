use crate::extract::types::EventExtractionResult;

/// What one conversation turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply was event data.
    Events {
        raw: String,
        result: EventExtractionResult,
    },
    /// A conversational reply, passed through unchanged.
    Message(String),
    /// The turn was cancelled mid-stream; nothing was kept.
    Cancelled,
}

/// Tracks where the session is between and during turns.
#[derive(Debug, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Completed turns (cancelled and failed ones are not counted).
    pub turns: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Streaming,
    Completed,
    Cancelled,
    Failed,
}
