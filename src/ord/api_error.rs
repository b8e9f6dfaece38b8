// src/ord/api_error.rs
//! Rendering of the registry's structured 400 body into a message a
//! caller can act on.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiFieldError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiFieldError {
    pub field: Option<String>,
    pub query_param: Option<String>,
    pub path_param: Option<String>,
    pub error_code: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// Turn a raw 400 body into a readable rejection message.
///
/// Falls back to a generic message when the body is not the documented
/// error structure.
pub fn format_rejection(body: &str) -> String {
    let parsed: ApiErrorBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return "the registry rejected the submitted data".to_string(),
    };

    let base = parsed
        .error
        .or(parsed.message)
        .unwrap_or_else(|| "data validation failed".to_string());

    let details: Vec<String> = parsed
        .errors
        .iter()
        .map(|err| {
            // The offending field can arrive under three different keys.
            let field = err
                .field
                .as_deref()
                .or(err.query_param.as_deref())
                .or(err.path_param.as_deref())
                .unwrap_or("unknown_field");
            let code = err.error_code.as_deref().unwrap_or("unknown_code");
            let message = err.message.as_deref().unwrap_or("");
            let value = err
                .values
                .first()
                .map(|v| format!(" value: {v}"))
                .unwrap_or_default();
            format!("- [{field}] {message} ({code}){value}")
        })
        .collect();

    if details.is_empty() {
        base
    } else {
        format!("{base}:\n{}", details.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_field_details() {
        let body = r#"{
            "error": "validation failed",
            "errors": [
                {"field": "inn", "error_code": "format", "message": "must be numeric", "values": ["12ab"]},
                {"query_param": "date", "error_code": "range", "message": "too early"}
            ]
        }"#;
        let rendered = format_rejection(body);
        assert!(rendered.starts_with("validation failed:"));
        assert!(rendered.contains("[inn] must be numeric (format) value: \"12ab\""));
        assert!(rendered.contains("[date] too early (range)"));
    }

    #[test]
    fn falls_back_to_top_level_message() {
        let rendered = format_rejection(r#"{"message": "contract not found"}"#);
        assert_eq!(rendered, "contract not found");
    }

    #[test]
    fn tolerates_non_json_bodies() {
        let rendered = format_rejection("<html>Bad Request</html>");
        assert_eq!(rendered, "the registry rejected the submitted data");
    }

    #[test]
    fn unknown_field_placeholder() {
        let rendered =
            format_rejection(r#"{"error": "oops", "errors": [{"message": "broken"}]}"#);
        assert!(rendered.contains("[unknown_field] broken (unknown_code)"));
    }
}
