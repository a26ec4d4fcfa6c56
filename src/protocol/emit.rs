use super::types::GenerateRequest;

/// Format a streaming generate request as the JSON body sent upstream.
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in practice).
pub fn format_generate_request(model: &str, prompt: &str) -> serde_json::Result<String> {
    let req = GenerateRequest {
        model: model.to_string(),
        prompt: prompt.to_string(),
        stream: true,
    };
    serde_json::to_string(&req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_simple_request() {
        let json = format_generate_request("llama2", "hello").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["model"], "llama2");
        assert_eq!(parsed["prompt"], "hello");
        assert_eq!(parsed["stream"], true);
    }

    #[test]
    fn format_request_with_special_chars() {
        let json = format_generate_request("llama2", "meet \"max\"\nfriday").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["prompt"], "meet \"max\"\nfriday");
    }
}
