use thiserror::Error;

/// Shown when the backend gives no usable message
pub const GENERIC_FAILURE: &str = "The request failed. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("No text could be extracted (scanned or image-only documents may not be supported)")]
    EmptyExtraction,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Build a service error from a non-success response body
    ///
    /// Uses the `detail` field of a JSON body when present, otherwise the
    /// generic fallback.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| match v.get("detail") {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                Some(other) if !other.is_null() => Some(other.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        ApiError::Service { status, message }
    }

    /// Message suitable for a transient toast
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_preferred() {
        let err = ApiError::from_body(400, r#"{"detail":"File too large"}"#);
        assert_eq!(err.user_message(), "File too large");
        assert!(matches!(err, ApiError::Service { status: 400, .. }));
    }

    #[test]
    fn structured_detail_is_stringified() {
        let err = ApiError::from_body(422, r#"{"detail":[{"loc":["body","text"]}]}"#);
        assert!(err.user_message().contains("loc"));
    }

    #[test]
    fn falls_back_without_detail() {
        assert_eq!(
            ApiError::from_body(500, "<html>oops</html>").user_message(),
            GENERIC_FAILURE
        );
        assert_eq!(
            ApiError::from_body(500, r#"{"detail":null}"#).user_message(),
            GENERIC_FAILURE
        );
    }
}
