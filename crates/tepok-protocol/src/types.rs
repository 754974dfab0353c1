//! Core value types: players, cards, screens, and the round phase.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One of the two players sharing the screen.
///
/// Player 1 owns the bottom half, player 2 the top half. Serialized as the
/// bare numbers `1` and `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Both players, in number order.
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// Zero-based index for per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// The player's number as shown on screen (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Game-over banner text.
    pub fn win_text(self) -> String {
        format!("Player {} Win", self.number())
    }
}

impl TryFrom<u8> for Player {
    type Error = ProtocolError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(ProtocolError::InvalidMessage(format!(
                "player must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<Player> for u8 {
    fn from(p: Player) -> u8 {
        p.number()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// A card rank, 1 (Ace) through 13 (King).
///
/// The same type is used for the called-out prompt, so matching is a plain
/// equality check. Out-of-range values cannot be constructed, including
/// through deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const KING: Rank = Rank(13);

    /// Every rank, Ace to King.
    pub const ALL: [Rank; 13] = [
        Rank(1), Rank(2), Rank(3), Rank(4), Rank(5), Rank(6), Rank(7),
        Rank(8), Rank(9), Rank(10), Rank(11), Rank(12), Rank(13),
    ];

    /// Returns `None` outside `1..=13`.
    pub fn new(value: u8) -> Option<Self> {
        (1..=13).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The next rank in the call-out cycle; King wraps to Ace.
    pub fn next(self) -> Self {
        if self.0 < 13 { Self(self.0 + 1) } else { Self::ACE }
    }

    /// Rank code used in card asset names: `A`, `02`..`10`, `J`, `Q`, `K`.
    pub fn asset_code(self) -> String {
        match self.0 {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => format!("{n:02}"),
        }
    }

    /// The word spoken and displayed for this rank when it is the prompt.
    pub fn spoken_word(self) -> String {
        match self.0 {
            1 => "Ace".to_string(),
            11 => "Jack".to_string(),
            12 => "Queen".to_string(),
            13 => "King".to_string(),
            n => n.to_string(),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            ProtocolError::InvalidMessage(format!("rank must be 1-13, got {value}"))
        })
    }
}

impl From<Rank> for u8 {
    fn from(r: Rank) -> u8 {
        r.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spoken_word())
    }
}

// ---------------------------------------------------------------------------
// Suit / Card
// ---------------------------------------------------------------------------

/// Card suit. Irrelevant to scoring; only affects the card art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn name(self) -> &'static str {
        match self {
            Self::Spades => "spades",
            Self::Hearts => "hearts",
            Self::Diamonds => "diamonds",
            Self::Clubs => "clubs",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The card face-up in the middle of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Asset key for the card art, e.g. `card_hearts_07` or `card_spades_K`.
    pub fn asset_key(&self) -> String {
        format!("card_{}_{}", self.suit.name(), self.rank.asset_code())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

// ---------------------------------------------------------------------------
// Screen / Phase
// ---------------------------------------------------------------------------

/// Which top-level screen the app is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Menu,
    Tutorial,
    Playing,
}

/// The round's admission state. Exactly one holds at a time.
///
/// ```text
///  reset ──► Countdown ──► Running ──tap──► Resolving ──► Running
///                            │  ▲                 └─────► GameOver
///                      pause ▼  │ resume
///                           Paused
/// ```
///
/// `Idle` covers every screen other than Playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Countdown,
    Running,
    Resolving,
    Paused,
    GameOver,
}

impl Phase {
    /// Taps and the turn ticker are only live while running.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Turn advance is suspended by a tap in flight or by the game ending.
    pub fn is_turn_paused(self) -> bool {
        matches!(self, Self::Resolving | Self::GameOver)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Countdown => write!(f, "Countdown"),
            Self::Running => write!(f, "Running"),
            Self::Resolving => write!(f, "Resolving"),
            Self::Paused => write!(f, "Paused"),
            Self::GameOver => write!(f, "GameOver"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tap outcome
// ---------------------------------------------------------------------------

/// What an accepted tap did to the tapping player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapVerdict {
    /// Card matched the prompt: +1.
    Scored,
    /// Wrong card: -1.
    LostPoint,
    /// Wrong card at zero score: no point lost, frozen for `seconds` instead.
    Frozen { seconds: u32 },
}

/// The tap being resolved, shown (slap hand + message) until resolution ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapOutcome {
    pub player: Player,
    pub verdict: TapVerdict,
}

impl TapOutcome {
    /// Feedback line for the presentation layer.
    pub fn feedback(&self) -> String {
        let n = self.player.number();
        match self.verdict {
            TapVerdict::Scored => format!("Player {n} got it!\n+1 point"),
            TapVerdict::LostPoint => format!("Player {n} slapped the wrong card!\n-1 point"),
            TapVerdict::Frozen { seconds } => {
                format!("Player {n} slapped the wrong card!\nFrozen for {seconds} seconds")
            }
        }
    }
}
