//! Pattern compilation errors.

use thiserror::Error;

/// Errors raised while compiling a path pattern.
///
/// These surface at route registration, never while matching.
#[derive(Error, Debug)]
pub enum PatternError {
    /// A `:` was not followed by a parameter name.
    #[error("missing parameter name at offset {offset} in pattern `{pattern}`")]
    MissingParamName {
        /// The offending pattern.
        pattern: String,
        /// Byte offset of the `:`.
        offset: usize,
    },

    /// A custom capture group was opened but never closed (or vice versa).
    #[error("unbalanced group in pattern `{pattern}`")]
    UnbalancedGroup {
        /// The offending pattern.
        pattern: String,
    },

    /// The same parameter name appears twice.
    #[error("duplicate parameter `{name}` in pattern `{pattern}`")]
    DuplicateParam {
        /// The offending pattern.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// The generated regular expression was rejected.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// The regex engine's complaint.
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// Returns the pattern that failed to compile.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::MissingParamName { pattern, .. }
            | Self::UnbalancedGroup { pattern }
            | Self::DuplicateParam { pattern, .. }
            | Self::InvalidRegex { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_pattern() {
        let err = PatternError::MissingParamName {
            pattern: "/:".to_string(),
            offset: 1,
        };
        assert!(err.to_string().contains("`/:`"));
        assert!(err.to_string().contains("offset 1"));
        assert_eq!(err.pattern(), "/:");
    }

    #[test]
    fn test_duplicate_param_display() {
        let err = PatternError::DuplicateParam {
            pattern: "/:a/:a".to_string(),
            name: "a".to_string(),
        };
        assert!(err.to_string().contains("duplicate parameter `a`"));
    }
}
