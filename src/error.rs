//! Error types for the delaycache library.
//!
//! Cache operations themselves are total and never fail; errors only arise
//! at the edges:
//!
//! - [`ConfigError`]: invalid configuration handed to a builder or parser
//!   (unknown policy/distribution names, out-of-range parameters).
//! - [`LoadError`]: malformed vector or ground-truth files rejected by the
//!   loaders before any payload reaches the cache.

use std::fmt;
use std::io;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when configuration parameters are invalid.
///
/// Carries a human-readable description of which parameter failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Error returned when a vector or ground-truth file cannot be loaded.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read at all.
    Io(io::Error),
    /// The fixed header is missing, inconsistent with the caller-supplied
    /// profile, or describes an impossible layout.
    Header(String),
    /// The body is shorter than the record count declared in the header.
    Truncated {
        /// Bytes the header promised.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Header(msg) => write!(f, "bad header: {msg}"),
            Self::Truncated { expected, actual } => {
                write!(f, "truncated body: expected {expected} bytes, found {actual}")
            },
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("capacity must be > 0");
        assert_eq!(err.to_string(), "capacity must be > 0");
        assert_eq!(err.message(), "capacity must be > 0");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    #[test]
    fn load_error_display_variants() {
        let header = LoadError::Header("dimension mismatch".into());
        assert!(header.to_string().contains("dimension mismatch"));

        let truncated = LoadError::Truncated {
            expected: 100,
            actual: 60,
        };
        let text = truncated.to_string();
        assert!(text.contains("100"));
        assert!(text.contains("60"));
    }

    #[test]
    fn load_error_wraps_io() {
        let err: LoadError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
