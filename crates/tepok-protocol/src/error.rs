//! Error types for the protocol layer.

/// Errors raised while encoding, decoding, or validating shared values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed input, missing fields, or a value
    /// rejected by one of the validating `TryFrom` impls.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A value decoded fine but is out of range (a rank of 14, player 3).
    #[error("invalid value: {0}")]
    InvalidMessage(String),
}
