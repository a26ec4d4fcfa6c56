use anyhow::Result;

use super::types::GenerateChunk;

/// Parse a single NDJSON line into a `GenerateChunk`.
///
/// Returns `Ok(None)` for blank lines.
/// Returns `Err` for lines that are not a generate envelope (caller should skip, not crash).
pub fn parse_line(line: &str) -> Result<Option<GenerateChunk>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let chunk: GenerateChunk = serde_json::from_str(line)?;
    Ok(Some(chunk))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_line() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("  \r\n").unwrap().is_none());
    }

    #[test]
    fn parse_minimal_envelope() {
        let chunk = parse_line(r#"{"response":"Hel","done":false}"#)
            .unwrap()
            .unwrap();
        assert_eq!(chunk.response, "Hel");
        assert!(!chunk.done);
    }

    #[test]
    fn telemetry_fields_dont_crash() {
        let line = r#"{"model":"llama2","created_at":"2025-08-01T10:00:00Z","response":"","done":true,"done_reason":"stop","context":[1,2,3],"total_duration":123,"load_duration":4,"prompt_eval_count":9,"eval_count":12,"eval_duration":99}"#;
        let chunk = parse_line(line).unwrap().unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.done_reason.as_deref(), Some("stop"));
        assert_eq!(chunk.model.as_deref(), Some("llama2"));
    }

    #[test]
    fn missing_required_field_is_error() {
        assert!(parse_line(r#"{"response":"x"}"#).is_err());
        assert!(parse_line(r#"{"done":true}"#).is_err());
    }

    #[test]
    fn garbage_is_error() {
        assert!(parse_line("data: keep-alive").is_err());
        assert!(parse_line(r#"{"response":"unterminated"#).is_err());
        assert!(parse_line("[1,2,3]").is_err());
    }
}
