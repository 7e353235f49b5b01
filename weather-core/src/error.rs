use thiserror::Error;

/// Failure of a single weather lookup.
///
/// The `Display` text of each variant is the diagnostic line shown to the
/// user, so it must not change.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered with an HTTP error status (unknown city, bad key).
    #[error("Invalid city name or API error.")]
    Rejected { status: u16, body: String },

    /// Transport-level failure: connect, timeout, reading the body.
    #[error("Error: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was not JSON or lacked a required field.
    #[error("Error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Rejected { .. })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("weather log is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_is_not_retryable() {
        let err = FetchError::Rejected { status: 404, body: String::new() };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Invalid city name or API error.");
    }

    #[test]
    fn decode_error_is_retryable_and_prefixed() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = FetchError::from(source);
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("Error: "));
    }
}
