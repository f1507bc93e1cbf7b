//! Error types for variable lookup.

use std::fmt;

use crate::template::ResolutionError;

/// Stable error codes, one per [`LookupError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No base namespace was supplied.
    NamespaceUnavailable,
    /// An unrecognised or malformed option was supplied.
    InvalidOption,
    /// A pattern entry is not a string.
    PatternType,
    /// A pattern failed to compile.
    PatternCompile,
    /// A matched name vanished from both namespaces.
    MissingVariable,
    /// A template reference inside a value could not be resolved.
    Resolution,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamespaceUnavailable => write!(f, "NAMESPACE_UNAVAILABLE"),
            Self::InvalidOption => write!(f, "INVALID_OPTION"),
            Self::PatternType => write!(f, "PATTERN_TYPE"),
            Self::PatternCompile => write!(f, "PATTERN_COMPILE"),
            Self::MissingVariable => write!(f, "MISSING_VARIABLE"),
            Self::Resolution => write!(f, "RESOLUTION"),
        }
    }
}

/// Every failure the lookup can produce. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No variables available to search")]
    NamespaceUnavailable,

    #[error("{message}; the only valid options are: {}", .valid.join(", "))]
    InvalidOption {
        message: String,
        valid: &'static [&'static str],
    },

    #[error("Invalid pattern at index {index}: {entry} is not a string, it is a {found}")]
    PatternType {
        index: usize,
        entry: String,
        found: &'static str,
    },

    #[error("Unable to use \"{pattern}\" as a search pattern: {reason}")]
    PatternCompile { pattern: String, reason: String },

    #[error("Unable to find variable {0}, it should be there though")]
    MissingVariable(String),

    #[error("Unable to resolve variable {name}: {source}")]
    Resolution {
        name: String,
        #[source]
        source: ResolutionError,
    },
}

impl LookupError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NamespaceUnavailable => ErrorCode::NamespaceUnavailable,
            Self::InvalidOption { .. } => ErrorCode::InvalidOption,
            Self::PatternType { .. } => ErrorCode::PatternType,
            Self::PatternCompile { .. } => ErrorCode::PatternCompile,
            Self::MissingVariable(_) => ErrorCode::MissingVariable,
            Self::Resolution { .. } => ErrorCode::Resolution,
        }
    }
}

/// Result alias used throughout the crate.
pub type LookupResult<T> = Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OPTION_NAMES;

    #[test]
    fn test_error_codes() {
        assert_eq!(LookupError::NamespaceUnavailable.code().to_string(), "NAMESPACE_UNAVAILABLE");
        assert_eq!(
            LookupError::MissingVariable("x".to_string()).code(),
            ErrorCode::MissingVariable
        );
    }

    #[test]
    fn test_invalid_option_lists_valid_names() {
        let err = LookupError::InvalidOption {
            message: "unknown option 'foo'".to_string(),
            valid: OPTION_NAMES,
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown option 'foo'"));
        assert!(msg.contains("list_merge, recursive, legacy, default"));
    }

    #[test]
    fn test_pattern_type_message() {
        let err = LookupError::PatternType {
            index: 2,
            entry: "5".to_string(),
            found: "number",
        };
        assert_eq!(
            err.to_string(),
            "Invalid pattern at index 2: 5 is not a string, it is a number"
        );
    }
}
