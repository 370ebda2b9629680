/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// Free-form failure, mostly used for poisoned shared state.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors raised by surfaces and config loading.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration files that fail to parse.
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration value outside of the accepted bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Algorithm name that does not match one of the supported engines.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// The run was cancelled while waiting on its pacing delay.
    #[error("sort run was cancelled")]
    Cancelled,
}

impl SortVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Shorthand for [`SortVizError::InvalidConfiguration`].
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Returns `true` when the error only signals a cancelled run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_pick_the_matching_variant() {
        assert!(matches!(SortVizError::msg("poisoned"), SortVizError::Message(_)));
        assert_eq!(
            SortVizError::invalid("size 0").to_string(),
            "invalid configuration: size 0"
        );
        assert!(SortVizError::Cancelled.is_cancelled());
        assert!(!SortVizError::msg("cancelled").is_cancelled());
    }
}
