/// Failures of one request to the generator, from building it to reading the
/// last line. Everything past the transport is recovered locally and never
/// shows up here.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("API call failed with code {code}")]
    Status { code: u16 },
    #[error("Response body is null")]
    EmptyBody,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("stream read failed: {0}")]
    Body(String),
    /// The request could not be built locally (prompt rendering or body
    /// encoding). Nothing was sent.
    #[error("failed to build request: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_is_user_facing() {
        let err = TransportError::Status { code: 503 };
        assert_eq!(err.to_string(), "API call failed with code 503");
    }

    #[test]
    fn request_error_names_the_local_step() {
        let err = TransportError::Request("failed to render extraction prompt".into());
        assert_eq!(
            err.to_string(),
            "failed to build request: failed to render extraction prompt"
        );
    }
}
