use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of the generator's streamed NDJSON output.
///
/// Only `response` and `done` are required; every other field the server
/// sends (timestamps, context tokens, eval timings) is accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateChunk {
    pub response: String,
    pub done: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(flatten)]
    _extra: Value,
}

/// The decoded form of a streamed line, handed to the aggregator and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFragment {
    pub model_text: String,
    pub is_final: bool,
}

impl From<GenerateChunk> for ResponseFragment {
    fn from(chunk: GenerateChunk) -> Self {
        Self {
            model_text: chunk.response,
            is_final: chunk.done,
        }
    }
}

/// Body of a `POST <base>/generate` request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}
