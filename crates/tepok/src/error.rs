//! Unified error type for Tepok.

use tepok_protocol::ProtocolError;
use tepok_round::RoundError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each wrapped variant lets `?` convert sub-crate errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum TepokError {
    /// Encoding or decoding a shared value failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The engine task is gone.
    #[error(transparent)]
    Round(#[from] RoundError),

    /// Host I/O (terminal, files) failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A setting supplied by the host could not be used.
    #[error("invalid config: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let tepok_err: TepokError = err.into();
        assert!(matches!(tepok_err, TepokError::Protocol(_)));
        assert!(tepok_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_round_error() {
        let tepok_err: TepokError = RoundError::Unavailable.into();
        assert!(matches!(tepok_err, TepokError::Round(_)));
        assert_eq!(tepok_err.to_string(), "round engine is unavailable");
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let tepok_err: TepokError = err.into();
        assert!(matches!(tepok_err, TepokError::Io(_)));
    }

    #[test]
    fn test_config_message() {
        let err = TepokError::Config("winning score must be a number".into());
        assert_eq!(err.to_string(), "invalid config: winning score must be a number");
    }
}
