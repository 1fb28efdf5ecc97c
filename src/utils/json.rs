//! Model Output Helpers
//!
//! Pulls the JSON payload out of a completion that may be wrapped in
//! markdown fences or surrounded by prose.

/// Extract JSON from an LLM response string, handling markdown fences.
pub fn extract_json_from_response(text: &str) -> String {
    let trimmed = text.trim();

    // Markdown code fences
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
    }

    // JSON object { ... }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Decode `text` as `T` after fence stripping. `None` on any failure.
pub fn decode_model_json<T: serde::de::DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::from_str(&extract_json_from_response(text)).ok()
}
