//! Read-only view of a round, handed to presentation and speech.

use serde::{Deserialize, Serialize};

use crate::{Card, Phase, Player, Rank, Screen, TapOutcome};

/// Everything a renderer needs to draw one frame of the game.
///
/// Produced by the engine after every state change. The boolean flags are
/// derived from `phase` so renderers that think in overlays (countdown,
/// pause menu, game-over banner) can read them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Bumped on every state change. Equal revisions mean equal state.
    pub revision: u64,
    pub screen: Screen,
    pub phase: Phase,
    /// The rank currently being called out.
    pub prompt: Rank,
    pub card: Card,
    pub score_p1: u32,
    pub score_p2: u32,
    pub frozen_p1: bool,
    pub frozen_p2: bool,
    /// Seconds left on player 1's freeze; `0.0` when not frozen.
    pub freeze_remaining_p1: f64,
    pub freeze_remaining_p2: f64,
    pub turn_paused: bool,
    pub user_paused: bool,
    pub countdown_active: bool,
    pub countdown_value: u8,
    pub game_over: bool,
    pub winner: Option<Player>,
    pub winning_score: u32,
    /// The tap being resolved, if any (slap hand + feedback message).
    pub feedback: Option<TapOutcome>,
}

impl RoundSnapshot {
    pub fn score(&self, player: Player) -> u32 {
        match player {
            Player::One => self.score_p1,
            Player::Two => self.score_p2,
        }
    }

    pub fn is_frozen(&self, player: Player) -> bool {
        match player {
            Player::One => self.frozen_p1,
            Player::Two => self.frozen_p2,
        }
    }

    pub fn freeze_remaining(&self, player: Player) -> f64 {
        match player {
            Player::One => self.freeze_remaining_p1,
            Player::Two => self.freeze_remaining_p2,
        }
    }

    /// Countdown overlay text: the number, then "Start!" at zero.
    pub fn countdown_label(&self) -> String {
        match self.countdown_value {
            0 => "Start!".to_string(),
            n => n.to_string(),
        }
    }

    /// The prompt as displayed on both players' halves.
    pub fn prompt_word(&self) -> String {
        self.prompt.spoken_word()
    }

    pub fn card_asset(&self) -> String {
        self.card.asset_key()
    }

    /// Game-over banner, once there is a winner.
    pub fn winner_text(&self) -> Option<String> {
        self.winner.map(Player::win_text)
    }
}

/// One page of the how-to-play screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialPage {
    pub title: String,
    pub body: String,
}

/// The how-to-play pages, filled in with the round's actual rules.
pub fn tutorial_pages(winning_score: u32, freeze_secs: u32) -> Vec<TutorialPage> {
    let page = |title: &str, body: String| TutorialPage {
        title: title.to_string(),
        body,
    };
    vec![
        page(
            "1. Know Your Tap Area",
            "Top half is Player 2.\nBottom half is Player 1.\nTap your side only!".to_string(),
        ),
        page(
            "2. Focus",
            "Wait until the spoken/written number matches the card number shown in the center."
                .to_string(),
        ),
        page(
            "3. Slap Fast!",
            format!(
                "Be the first to slap your area to get +1 Point.\nFirst to {winning_score} Points wins!"
            ),
        ),
        page(
            "4. Penalty",
            format!(
                "Wrong slap makes you lose 1 Point.\nIf your score is 0 and you slap incorrectly, you FREEZE for {freeze_secs} seconds."
            ),
        ),
    ]
}
