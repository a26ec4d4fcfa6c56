use std::future::Future;

use bytes::BytesMut;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::TransportError;
use crate::protocol::emit::format_generate_request;

const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Raw lines of one streamed response, in arrival order.
pub type LineStream = BoxStream<'static, Result<String, TransportError>>;

/// Newline framing that drops over-long lines and keeps reading.
///
/// `FramedRead` ends the stream after the first decode error, so an oversized
/// line must never surface as one.
#[derive(Debug)]
struct EnvelopeLines(LinesCodec);

impl EnvelopeLines {
    fn new(max_length: usize) -> Self {
        Self(LinesCodec::new_with_max_length(max_length))
    }
}

impl Decoder for EnvelopeLines {
    type Item = String;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, LinesCodecError> {
        loop {
            match self.0.decode(buf) {
                // The inner codec is now discarding up to the next newline.
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!(max = self.0.max_length(), "skipping oversized stream line");
                }
                other => return other,
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, LinesCodecError> {
        loop {
            match self.0.decode_eof(buf) {
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!(max = self.0.max_length(), "skipping oversized stream line");
                }
                other => return other,
            }
        }
    }
}

/// Anything that can run a prompt and hand back the response as lines.
pub trait StreamSource {
    fn open(&self, prompt: &str) -> impl Future<Output = Result<LineStream, TransportError>> + Send;
}

/// Streams `POST <base>/generate` over HTTP.
#[derive(Debug, Clone)]
pub struct GenerateClient {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl GenerateClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            url: config.generate_url(),
            model: config.model.clone(),
        }
    }
}

impl StreamSource for GenerateClient {
    async fn open(&self, prompt: &str) -> Result<LineStream, TransportError> {
        let body = format_generate_request(&self.model, prompt)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        info!(url = %self.url, model = %self.model, "sending generate request");

        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "generate request failed");
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }
        if response.content_length() == Some(0) {
            warn!("generate response has no body");
            return Err(TransportError::EmptyBody);
        }

        let bytes = response.bytes_stream().map_err(std::io::Error::other);
        let lines = FramedRead::new(StreamReader::new(bytes), EnvelopeLines::new(MAX_LINE_LENGTH));
        Ok(lines
            .map_err(|e| TransportError::Body(e.to_string()))
            .boxed())
    }
}
