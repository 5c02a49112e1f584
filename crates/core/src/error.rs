//! Configuration errors raised by validating builder setters.
//!
//! Rendering never fails: incomplete builders produce a degenerate but
//! well-formed fragment and the server performs authoritative validation.
//! The few setters that validate eagerly return [`ConfigError`].

use thiserror::Error;

/// Error returned synchronously from a validating setter.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A concept-extension weight outside `[0, 1]` (NaN included).
    #[error("weight must be within [0, 1], got {0}")]
    WeightOutOfRange(f32),

    /// A media byte source could not be read to the end.
    #[error("failed to read media source: {0}")]
    MediaRead(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_error_names_the_value() {
        let err = ConfigError::WeightOutOfRange(1.5);
        assert_eq!(err.to_string(), "weight must be within [0, 1], got 1.5");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::MediaRead(_)));
        assert!(err.to_string().contains("short read"));
    }
}
