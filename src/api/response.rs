//! Turning API responses into values or errors
//!
//! The backend reports failures as Django REST Framework error bodies: either
//! `{"detail": "..."}` or a map of field names to message lists such as
//! `{"email": ["user with this email already exists."]}`.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{Result, VitalPathError};

/// Returns the response if its status is a success, otherwise an
/// [`VitalPathError::Api`] carrying the server's message.
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::debug!(status = status.as_u16(), %message, "API returned an error");
    Err(VitalPathError::Api {
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Checks the status, then decodes the JSON body into `T`.
pub async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    let text = response.text().await.map_err(VitalPathError::Http)?;
    serde_json::from_str(&text).map_err(|e| {
        VitalPathError::InvalidResponse(format!("could not decode response: {}", e)).into()
    })
}

/// Extracts a human-readable message from an error body.
///
/// # Examples
///
/// ```
/// use vitalpath::api::response::error_message;
///
/// assert_eq!(
///     error_message(r#"{"detail": "Invalid credentials."}"#).as_deref(),
///     Some("Invalid credentials."),
/// );
/// assert_eq!(
///     error_message(r#"{"email": ["Enter a valid email address."]}"#).as_deref(),
///     Some("email: Enter a valid email address."),
/// );
/// ```
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        // Plain-text bodies are shown as-is when short; HTML error pages are not.
        Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => {
            return Some(trimmed.to_string())
        }
        Err(_) => return None,
    };

    if let Some(detail) = value.get("detail").and_then(first_text) {
        return Some(detail);
    }

    let fields = value.as_object()?;
    fields.iter().find_map(|(field, messages)| {
        let text = first_text(messages)?;
        if field == "non_field_errors" {
            Some(text)
        } else {
            Some(format!("{}: {}", field, text))
        }
    })
}

fn first_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(first_text),
        serde_json::Value::Object(map) => map.values().find_map(first_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message() {
        let body = r#"{"detail":"Discovery data already exists.","existing_uuid":"x"}"#;
        assert_eq!(error_message(body).unwrap(), "Discovery data already exists.");
    }

    #[test]
    fn test_field_error_message() {
        assert_eq!(
            error_message(r#"{"age":["Participants must be 18 or older."]}"#).unwrap(),
            "age: Participants must be 18 or older."
        );
    }

    #[test]
    fn test_non_field_errors_are_unprefixed() {
        assert_eq!(
            error_message(r#"{"non_field_errors":["Unable to log in."]}"#).unwrap(),
            "Unable to log in."
        );
    }

    #[test]
    fn test_nested_field_error() {
        assert_eq!(
            error_message(r#"{"height_feet":"Height must be between 3-8 feet."}"#).unwrap(),
            "height_feet: Height must be between 3-8 feet."
        );
    }

    #[test]
    fn test_plain_text_and_html_bodies() {
        assert_eq!(error_message("Bad Gateway").unwrap(), "Bad Gateway");
        assert!(error_message("<html><body>Server Error</body></html>").is_none());
        assert!(error_message("   ").is_none());
    }
}
