//! Error types for textguard

/// Result type alias using textguard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for textguard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Validator construction errors
    #[error("validator error: {0}")]
    Validator(String),

    /// External judgment capability errors
    #[error("judge error: {0}")]
    Judge(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Custom validator plugin resolution errors
    #[error("plugin error: {0}")]
    Plugin(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML (de)serialization errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new validator error
    pub fn validator(msg: impl Into<String>) -> Self {
        Self::Validator(msg.into())
    }

    /// Create a new judge error
    pub fn judge(msg: impl Into<String>) -> Self {
        Self::Judge(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new plugin error
    pub fn plugin(msg: impl Into<String>) -> Self {
        Self::Plugin(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::config("bad max_length").to_string(),
            "configuration error: bad max_length"
        );
        assert_eq!(Error::Timeout.to_string(), "operation timed out");
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("\"nope\"");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
