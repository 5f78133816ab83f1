use thiserror::Error;

/// Main error type for the rating engine
#[derive(Error, Debug)]
pub enum WineEngineError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Candidate source errors
    #[error("Source '{source_name}' error: {message}")]
    Source { source_name: String, message: String },

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl WineEngineError {
    pub fn source_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        WineEngineError::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<String> for WineEngineError {
    fn from(s: String) -> Self {
        WineEngineError::Other(s)
    }
}

impl From<&str> for WineEngineError {
    fn from(s: &str) -> Self {
        WineEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WineEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = WineEngineError::source_error("vivino", "HTTP 429");
        assert_eq!(err.to_string(), "Source 'vivino' error: HTTP 429");
    }

    #[test]
    fn test_from_str() {
        let err: WineEngineError = "boom".into();
        assert!(matches!(err, WineEngineError::Other(ref m) if m == "boom"));
    }
}
