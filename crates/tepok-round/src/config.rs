//! Round configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rules and timing for a round.
///
/// The defaults are the shipped game: sudden death (first point wins), a
/// 3-2-1 countdown, one prompt per second, and a 5 second freeze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Score that ends the round. At least 1.
    pub winning_score: u32,

    /// First number shown by the pre-round countdown.
    pub countdown_from: u8,

    /// Time between countdown steps.
    pub countdown_step: Duration,

    /// How long each prompt/card pair stays up before the turn advances.
    pub turn_period: Duration,

    /// Granularity of freeze decay. Freeze timers lose this much per tick.
    pub freeze_tick: Duration,

    /// Freeze imposed on a wrong tap at zero score.
    pub freeze_penalty: Duration,

    /// How long input stays blocked after an accepted tap.
    pub resolution_delay: Duration,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            winning_score: 1,
            countdown_from: 3,
            countdown_step: Duration::from_secs(1),
            turn_period: Duration::from_secs(1),
            freeze_tick: Duration::from_millis(100),
            freeze_penalty: Duration::from_secs(5),
            resolution_delay: Duration::from_secs(2),
        }
    }
}

impl RoundConfig {
    /// Shortest period accepted for any timer.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Default config with a different target score.
    pub fn with_winning_score(winning_score: u32) -> Self {
        Self {
            winning_score,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to run.
    ///
    /// Called by [`RoundEngine::new`](crate::RoundEngine::new). Rules:
    /// - `winning_score` at least 1 (0 would end the round before it starts).
    /// - Every period at least [`Self::MIN_PERIOD`].
    /// - `freeze_tick` no longer than `turn_period`.
    pub fn validated(mut self) -> Self {
        if self.winning_score == 0 {
            warn!("winning_score of 0, clamping to 1");
            self.winning_score = 1;
        }
        for (name, period) in [
            ("countdown_step", &mut self.countdown_step),
            ("turn_period", &mut self.turn_period),
            ("freeze_tick", &mut self.freeze_tick),
            ("freeze_penalty", &mut self.freeze_penalty),
            ("resolution_delay", &mut self.resolution_delay),
        ] {
            if *period < Self::MIN_PERIOD {
                warn!(name, ?period, "period too small, clamping");
                *period = Self::MIN_PERIOD;
            }
        }
        if self.freeze_tick > self.turn_period {
            warn!(
                freeze_tick = ?self.freeze_tick,
                turn_period = ?self.turn_period,
                "freeze_tick longer than turn_period, clamping"
            );
            self.freeze_tick = self.turn_period;
        }
        self
    }

    /// Freeze penalty in whole seconds, rounded up, for rule text and
    /// feedback. A sub-second penalty reads as 1 second.
    pub fn freeze_secs(&self) -> u32 {
        let secs = self.freeze_penalty.as_millis().div_ceil(1000);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}
