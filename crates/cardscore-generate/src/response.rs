use cardscore_core::Record;

use crate::errors::GenerateError;

/// Extract the JSON payload from a raw generator response.
///
/// Text models often wrap their answer in a fenced block; a ```json fence is
/// preferred, then any bare fence, then the whole response.
pub fn extract_json_block(raw: &str) -> &str {
    if let Some((_, rest)) = raw.split_once("```json") {
        let body = rest.split("```").next().unwrap_or(rest);
        return body.trim();
    }
    if let Some((_, rest)) = raw.split_once("```") {
        let body = rest.split("```").next().unwrap_or(rest);
        return body.trim();
    }
    raw.trim()
}

/// Parse a raw generator response into a generated record.
pub fn parse_generated_response(raw: &str) -> Result<Record, GenerateError> {
    let body = extract_json_block(raw);
    if body.is_empty() {
        return Err(GenerateError::InvalidResponse(
            "response contains no JSON payload".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    let record = Record::from_json(value)?;
    tracing::debug!(event = "response_parsed", fields = record.len());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_json_fence() {
        let raw = "Aquí está:\n```json\n{\"canal\": \"Email\"}\n```\nSaludos";
        assert_eq!(extract_json_block(raw), "{\"canal\": \"Email\"}");
    }

    #[test]
    fn falls_back_to_bare_fence_and_plain_text() {
        assert_eq!(extract_json_block("```\n{}\n```"), "{}");
        assert_eq!(extract_json_block("  {\"a\": \"b\"} "), "{\"a\": \"b\"}");
    }
}
