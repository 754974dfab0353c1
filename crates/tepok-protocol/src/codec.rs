//! Codec trait and implementations for shipping snapshots out of process.
//!
//! The engine hands out [`RoundSnapshot`](crate::RoundSnapshot) values.
//! When the renderer lives elsewhere (a webview, a test harness reading
//! stdout) those values need bytes; a [`Codec`] is the seam for that.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or a
    /// validated field (rank, player) is out of range.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use tepok_protocol::{Codec, JsonCodec, Player};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&Player::Two).unwrap();
/// assert_eq!(bytes, b"2");
///
/// let back: Player = codec.decode(&bytes).unwrap();
/// assert_eq!(back, Player::Two);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{tutorial_pages, Card, Phase, Rank, RoundSnapshot, Screen, Suit};

    fn sample() -> RoundSnapshot {
        RoundSnapshot {
            revision: 4,
            screen: Screen::Playing,
            phase: Phase::Running,
            prompt: Rank::new(7).unwrap(),
            card: Card { rank: Rank::new(12).unwrap(), suit: Suit::Hearts },
            score_p1: 0,
            score_p2: 0,
            frozen_p1: true,
            frozen_p2: false,
            freeze_remaining_p1: 3.5,
            freeze_remaining_p2: 0.0,
            turn_paused: false,
            user_paused: false,
            countdown_active: false,
            countdown_value: 0,
            game_over: false,
            winner: None,
            winning_score: 1,
            feedback: None,
        }
    }

    #[test]
    fn test_snapshot_json_shape() {
        let bytes = JsonCodec.encode(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["prompt"], 7);
        assert_eq!(value["card"]["rank"], 12);
        assert_eq!(value["card"]["suit"], "hearts");
        assert_eq!(value["screen"], "playing");
        assert_eq!(value["phase"], "Running");
    }

    #[test]
    fn test_decode_rejects_bad_rank() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["card"]["rank"] = 14.into();
        let bytes = serde_json::to_vec(&value).unwrap();
        let err = JsonCodec.decode::<RoundSnapshot>(&bytes).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
        assert!(err.to_string().contains("rank must be 1-13"));
    }

    #[test]
    fn test_decode_rejects_malformed_bytes() {
        let result: Result<RoundSnapshot, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_snapshot_labels() {
        let mut snap = sample();
        assert_eq!(snap.prompt_word(), "7");
        assert_eq!(snap.card_asset(), "card_hearts_Q");
        assert_eq!(snap.countdown_label(), "Start!");
        snap.countdown_value = 2;
        assert_eq!(snap.countdown_label(), "2");
        assert_eq!(snap.winner_text(), None);
    }

    #[test]
    fn test_tutorial_mentions_rules() {
        let pages = tutorial_pages(3, 5);
        assert_eq!(pages.len(), 4);
        assert!(pages[2].body.contains("First to 3 Points wins!"));
        assert!(pages[3].body.contains("FREEZE for 5 seconds"));
    }
}
