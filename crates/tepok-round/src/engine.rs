//! The round state machine.
//!
//! A [`RoundEngine`] owns the round state, the scheduler, the speech
//! collaborator, and the card RNG. Every mutation goes through `&mut self`,
//! so a tap is checked and applied in one step; a second tap arriving in
//! the same input batch sees `Phase::Resolving` and is dropped.
//!
//! Timer callbacks re-check the phase when they fire. Cancellation keeps
//! new ticks from starting; the fire-time check keeps anything that slips
//! through from touching state.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tepok_clock::{Fired, Scheduler, TimerKind};
use tepok_protocol::{
    Card, Phase, Player, Rank, RoundSnapshot, Screen, Suit, TapOutcome, TapVerdict,
};
use tracing::{debug, info, trace};

use crate::{Announcer, RoundConfig};

/// Single-owner round engine.
///
/// Starts on the menu. [`reset`](Self::reset) (or navigating to
/// [`Screen::Playing`]) begins a round with the countdown; time is moved
/// with [`advance_to`](Self::advance_to).
pub struct RoundEngine<A, R = StdRng> {
    config: RoundConfig,
    announcer: A,
    rng: R,
    clock: Scheduler,
    screen: Screen,
    phase: Phase,
    prompt: Rank,
    card: Card,
    scores: [u32; 2],
    /// Freeze left per player. A player is frozen exactly while this is
    /// non-zero; there is no separate flag to fall out of sync.
    freeze: [Duration; 2],
    countdown: u8,
    winner: Option<Player>,
    feedback: Option<TapOutcome>,
    revision: u64,
}

impl<A: Announcer> RoundEngine<A, StdRng> {
    /// Creates an engine on the menu screen with an OS-seeded RNG.
    pub fn new(config: RoundConfig, announcer: A) -> Self {
        Self::with_rng(config, announcer, StdRng::from_os_rng())
    }
}

impl<A: Announcer, R: Rng> RoundEngine<A, R> {
    /// Creates an engine on the menu screen drawing cards from `rng`.
    pub fn with_rng(config: RoundConfig, announcer: A, mut rng: R) -> Self {
        let config = config.validated();
        let card = draw_card(&mut rng);
        Self {
            countdown: config.countdown_from,
            config,
            announcer,
            rng,
            clock: Scheduler::new(),
            screen: Screen::Menu,
            phase: Phase::Idle,
            prompt: Rank::ACE,
            card,
            scores: [0; 2],
            freeze: [Duration::ZERO; 2],
            winner: None,
            feedback: None,
            revision: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Starts a fresh round: cancels every timer, zeroes the state, deals a
    /// new card, and enters the countdown. Legal from anywhere.
    pub fn reset(&mut self) {
        self.clock.cancel_all();
        self.announcer.stop();

        self.screen = Screen::Playing;
        self.phase = Phase::Countdown;
        self.prompt = Rank::ACE;
        self.card = draw_card(&mut self.rng);
        self.scores = [0; 2];
        self.freeze = [Duration::ZERO; 2];
        self.countdown = self.config.countdown_from;
        self.winner = None;
        self.feedback = None;

        self.clock
            .schedule_repeating(TimerKind::Countdown, self.config.countdown_step);
        self.touch();
        info!(card = %self.card, winning_score = self.config.winning_score, "round reset");
    }

    /// A player slapped their half of the screen.
    ///
    /// Accepted only while running and only if the player is not frozen;
    /// anything else is a no-op returning `None`. An accepted tap scores,
    /// blocks input for the resolution delay, and returns the outcome.
    pub fn tap(&mut self, player: Player) -> Option<TapOutcome> {
        if self.screen != Screen::Playing || !self.phase.is_running() || self.is_frozen(player) {
            trace!(%player, phase = %self.phase, "tap ignored");
            return None;
        }

        self.phase = Phase::Resolving;
        self.clock.cancel(TimerKind::Turn);
        self.clock.cancel(TimerKind::FreezeDecay);
        self.announcer.stop();

        let idx = player.index();
        let verdict = if self.prompt == self.card.rank {
            self.scores[idx] += 1;
            TapVerdict::Scored
        } else if self.scores[idx] > 0 {
            self.scores[idx] -= 1;
            TapVerdict::LostPoint
        } else {
            self.freeze[idx] = self.config.freeze_penalty;
            TapVerdict::Frozen {
                seconds: self.config.freeze_secs(),
            }
        };

        let outcome = TapOutcome { player, verdict };
        self.feedback = Some(outcome);
        self.winner = Player::BOTH
            .into_iter()
            .find(|p| self.scores[p.index()] >= self.config.winning_score);

        self.clock
            .schedule_once(TimerKind::Resolution, self.config.resolution_delay);
        self.touch();
        debug!(
            %player,
            prompt = %self.prompt,
            card = %self.card,
            ?verdict,
            score = self.scores[idx],
            finished = self.winner.is_some(),
            "tap accepted"
        );
        Some(outcome)
    }

    /// Pauses a running round. Returns `false` (no-op) in any other phase.
    pub fn pause(&mut self) -> bool {
        if self.screen != Screen::Playing || !self.phase.is_running() {
            return false;
        }
        self.phase = Phase::Paused;
        self.stop_tickers();
        self.announcer.stop();
        self.touch();
        debug!(prompt = %self.prompt, "round paused");
        true
    }

    /// Resumes a paused round. Returns `false` (no-op) unless paused.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        self.announce_prompt();
        self.start_tickers();
        self.touch();
        debug!(prompt = %self.prompt, "round resumed");
        true
    }

    /// Moves to another screen. Returns `false` if the move is not allowed.
    ///
    /// - `Playing` starts a fresh round (same as [`reset`](Self::reset)).
    /// - `Menu` stops every timer and the announcer, and drops any pause
    ///   or game-over overlay.
    /// - `Tutorial` is only reachable from the menu.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        match screen {
            Screen::Playing => {
                self.reset();
                true
            }
            Screen::Menu => {
                if self.screen == Screen::Menu {
                    return false;
                }
                self.clock.cancel_all();
                self.announcer.stop();
                self.screen = Screen::Menu;
                self.phase = Phase::Idle;
                self.winner = None;
                self.feedback = None;
                self.touch();
                info!("back to menu");
                true
            }
            Screen::Tutorial => {
                if self.screen != Screen::Menu {
                    return false;
                }
                self.screen = Screen::Tutorial;
                self.touch();
                true
            }
        }
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Runs every timer due up to virtual time `t`, in deadline order, then
    /// moves the clock to `t`.
    pub fn advance_to(&mut self, t: Duration) {
        while let Some(fired) = self.clock.pop_due(t) {
            self.on_timer(fired);
        }
        self.clock.advance_to(t);
    }

    /// Runs the clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.clock.now() + dt);
    }

    fn on_timer(&mut self, fired: Fired) {
        match fired.token.kind {
            TimerKind::Countdown => self.countdown_step(),
            TimerKind::Turn => self.turn_tick(),
            TimerKind::FreezeDecay => self.freeze_tick(),
            TimerKind::Resolution => self.finish_resolution(),
        }
    }

    fn countdown_step(&mut self) {
        if self.phase != Phase::Countdown {
            return;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            self.touch();
            return;
        }

        self.clock.cancel(TimerKind::Countdown);
        self.phase = Phase::Running;
        self.announce_prompt();
        self.start_tickers();
        self.touch();
        info!(prompt = %self.prompt, card = %self.card, "round started");
    }

    fn turn_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.advance_turn();
    }

    /// Calls out the next rank and deals a new card. Scores are untouched.
    fn advance_turn(&mut self) {
        self.prompt = self.prompt.next();
        self.card = draw_card(&mut self.rng);
        self.announce_prompt();
        self.touch();
        trace!(prompt = %self.prompt, card = %self.card, "turn advanced");
    }

    fn freeze_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let tick = self.config.freeze_tick;
        let mut changed = false;
        for player in Player::BOTH {
            let remaining = &mut self.freeze[player.index()];
            if remaining.is_zero() {
                continue;
            }
            *remaining = remaining.saturating_sub(tick);
            changed = true;
            if remaining.is_zero() {
                debug!(%player, "freeze over");
            }
        }
        if changed {
            self.touch();
        }
    }

    fn finish_resolution(&mut self) {
        if self.phase != Phase::Resolving {
            return;
        }
        self.feedback = None;

        match self.winner {
            Some(winner) => {
                self.phase = Phase::GameOver;
                self.clock.cancel_all();
                info!(%winner, p1 = self.scores[0], p2 = self.scores[1], "game over");
            }
            None => {
                self.phase = Phase::Running;
                self.announce_prompt();
                self.start_tickers();
            }
        }
        self.touch();
    }

    fn start_tickers(&mut self) {
        self.clock
            .schedule_repeating(TimerKind::Turn, self.config.turn_period);
        self.clock
            .schedule_repeating(TimerKind::FreezeDecay, self.config.freeze_tick);
    }

    fn stop_tickers(&mut self) {
        self.clock.cancel(TimerKind::Turn);
        self.clock.cancel(TimerKind::FreezeDecay);
    }

    fn announce_prompt(&mut self) {
        self.announcer.stop();
        self.announcer.announce(&self.prompt.spoken_word());
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Read-only view of the current state.
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            revision: self.revision,
            screen: self.screen,
            phase: self.phase,
            prompt: self.prompt,
            card: self.card,
            score_p1: self.scores[0],
            score_p2: self.scores[1],
            frozen_p1: !self.freeze[0].is_zero(),
            frozen_p2: !self.freeze[1].is_zero(),
            freeze_remaining_p1: self.freeze[0].as_secs_f64(),
            freeze_remaining_p2: self.freeze[1].as_secs_f64(),
            turn_paused: self.phase.is_turn_paused(),
            user_paused: self.phase == Phase::Paused,
            countdown_active: self.phase == Phase::Countdown,
            countdown_value: self.countdown,
            game_over: self.phase == Phase::GameOver,
            winner: self.winner,
            winning_score: self.config.winning_score,
            feedback: self.feedback,
        }
    }

    /// Change counter; bumped by every state mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn prompt(&self) -> Rank {
        self.prompt
    }

    pub fn card(&self) -> Card {
        self.card
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn is_frozen(&self, player: Player) -> bool {
        !self.freeze[player.index()].is_zero()
    }

    pub fn freeze_remaining(&self, player: Player) -> Duration {
        self.freeze[player.index()]
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// When the next timer fires, or `None` if nothing is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.clock.next_deadline()
    }

    pub fn clock(&self) -> &Scheduler {
        &self.clock
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    pub fn announcer_mut(&mut self) -> &mut A {
        &mut self.announcer
    }
}

/// Independent uniform draw: 13 ranks × 4 suits.
fn draw_card<R: Rng>(rng: &mut R) -> Card {
    Card {
        rank: Rank::ALL[rng.random_range(0..Rank::ALL.len())],
        suit: Suit::ALL[rng.random_range(0..Suit::ALL.len())],
    }
}
