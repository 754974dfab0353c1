//! Virtual-time timer scheduler for Tepok.
//!
//! The round engine never sleeps. Every wait (countdown steps, the turn
//! ticker, freeze decay, the tap-resolution delay) is a timer armed on a
//! [`Scheduler`], and time only moves when the owner calls
//! [`Scheduler::pop_due`] / [`Scheduler::advance_to`]. Tests drive the clock
//! by hand; the engine actor drives it from wall-clock time through a
//! [`Pacer`].
//!
//! # One live timer per kind
//!
//! The scheduler has exactly one slot per [`TimerKind`]. Arming a kind
//! replaces whatever was in its slot and bumps that kind's generation, so
//! two turn tickers can never run side by side:
//!
//! ```
//! use std::time::Duration;
//! use tepok_clock::{Scheduler, TimerKind};
//!
//! let mut clock = Scheduler::new();
//! let first = clock.schedule_repeating(TimerKind::Turn, Duration::from_secs(1));
//! let second = clock.schedule_repeating(TimerKind::Turn, Duration::from_secs(1));
//! assert!(!clock.is_current(first));
//! assert!(clock.is_current(second));
//!
//! let fired = clock.pop_due(Duration::from_secs(3)).unwrap();
//! assert_eq!(fired.token, second);
//! assert_eq!(fired.at, Duration::from_secs(1));
//! ```
//!
//! # Integration
//!
//! Inside an actor loop the next deadline is turned into a Tokio sleep:
//!
//! ```ignore
//! loop {
//!     let deadline = engine.next_deadline();
//!     tokio::select! {
//!         Some(cmd) = rx.recv() => { /* handle command */ }
//!         _ = pacer.sleep_until(deadline) => engine.advance_to(pacer.elapsed()),
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{trace, warn};

// ---------------------------------------------------------------------------
// Timer identity
// ---------------------------------------------------------------------------

/// The kinds of timer the round engine uses. Each kind owns one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Pre-round countdown step (3, 2, 1, Start!).
    Countdown,
    /// Turn advance while running.
    Turn,
    /// Fine-grained freeze penalty decay.
    FreezeDecay,
    /// Delay between an accepted tap and the return to play (or game over).
    Resolution,
}

impl TimerKind {
    /// Every kind, in slot order.
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Countdown,
        TimerKind::Turn,
        TimerKind::FreezeDecay,
        TimerKind::Resolution,
    ];

    fn slot(self) -> usize {
        match self {
            Self::Countdown => 0,
            Self::Turn => 1,
            Self::FreezeDecay => 2,
            Self::Resolution => 3,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Countdown => write!(f, "countdown"),
            Self::Turn => write!(f, "turn"),
            Self::FreezeDecay => write!(f, "freeze-decay"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}

/// Identifies one arming of a timer kind.
///
/// The generation is bumped every time the kind is armed or cancelled, so
/// a token held from an earlier arming never compares current again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

/// A timer that came due, returned by [`Scheduler::pop_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub token: TimerToken,
    /// Virtual time at which the timer fired.
    pub at: Duration,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters kept by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockMetrics {
    /// Total arm calls (including re-arms that replaced a live timer).
    pub armed: u64,
    /// Total timers fired.
    pub fired: u64,
    /// Total live timers removed by `cancel`/`cancel_all` or replaced.
    pub cancelled: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Smallest repeating period accepted. Zero would fire forever at one instant.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u64,
    deadline: Duration,
    period: Option<Duration>,
    /// Arm order, breaks ties between timers due at the same instant.
    seq: u64,
}

/// Deterministic single-owner timer scheduler.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    slots: [Option<Slot>; 4],
    generations: [u64; 4],
    seq: u64,
    metrics: ClockMetrics,
}

impl Scheduler {
    /// Creates a scheduler at virtual time zero with nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arms `kind` to fire once, `delay` from now. Replaces any live timer
    /// of the same kind.
    pub fn schedule_once(&mut self, kind: TimerKind, delay: Duration) -> TimerToken {
        self.arm(kind, delay, None)
    }

    /// Arms `kind` to fire every `period`, first at `now + period`.
    /// Replaces any live timer of the same kind.
    pub fn schedule_repeating(&mut self, kind: TimerKind, period: Duration) -> TimerToken {
        let period = if period < MIN_PERIOD {
            warn!(%kind, ?period, "repeating period too small, clamping");
            MIN_PERIOD
        } else {
            period
        };
        self.arm(kind, period, Some(period))
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration, period: Option<Duration>) -> TimerToken {
        let idx = kind.slot();
        if self.slots[idx].is_some() {
            self.metrics.cancelled += 1;
        }
        self.generations[idx] += 1;
        self.seq += 1;
        let generation = self.generations[idx];
        self.slots[idx] = Some(Slot {
            generation,
            deadline: self.now + delay,
            period,
            seq: self.seq,
        });
        self.metrics.armed += 1;
        trace!(%kind, generation, ?delay, repeating = period.is_some(), "timer armed");
        TimerToken { kind, generation }
    }

    /// Disarms `kind`. Returns `true` if a live timer was removed.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let idx = kind.slot();
        // Bumped even when empty so earlier tokens stay stale.
        self.generations[idx] += 1;
        match self.slots[idx].take() {
            Some(_) => {
                self.metrics.cancelled += 1;
                trace!(%kind, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Disarms every kind.
    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ALL {
            self.cancel(kind);
        }
    }

    /// Whether `kind` currently has a live timer.
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    /// Whether `token` still refers to the live arming of its kind.
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.slots[token.kind.slot()].is_some_and(|s| s.generation == token.generation)
    }

    /// The earliest live deadline, or `None` if nothing is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.earliest().map(|(_, slot)| slot.deadline)
    }

    fn earliest(&self) -> Option<(TimerKind, Slot)> {
        TimerKind::ALL
            .iter()
            .filter_map(|&kind| self.slots[kind.slot()].map(|slot| (kind, slot)))
            .min_by_key(|(_, slot)| (slot.deadline, slot.seq))
    }

    /// Pops the earliest timer due at or before `until`.
    ///
    /// Moves the clock to that timer's deadline. A repeating timer is
    /// re-armed one period later under the same generation; a one-shot
    /// timer's slot is cleared. Returns `None` once nothing is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let (kind, slot) = self.earliest()?;
        if slot.deadline > until {
            return None;
        }

        let idx = kind.slot();
        self.now = self.now.max(slot.deadline);
        self.slots[idx] = match slot.period {
            Some(period) => {
                self.seq += 1;
                Some(Slot {
                    deadline: slot.deadline + period,
                    seq: self.seq,
                    ..slot
                })
            }
            None => None,
        };
        self.metrics.fired += 1;
        trace!(%kind, generation = slot.generation, at = ?self.now, "timer fired");

        Some(Fired {
            token: TimerToken {
                kind,
                generation: slot.generation,
            },
            at: self.now,
        })
    }

    /// Moves the clock forward to `t`. Never moves it backward.
    ///
    /// Callers should drain [`pop_due`](Self::pop_due) first; timers left
    /// behind by a jump are still returned by the next `pop_due`.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    /// Snapshot of the counters.
    pub fn metrics(&self) -> &ClockMetrics {
        &self.metrics
    }
}

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/// Maps the scheduler's virtual time onto Tokio's clock.
///
/// The pacer remembers the Tokio instant it started at and the virtual
/// time that instant stands for, so a scheduler that has already run for
/// a while can be handed to a pacer without its deadlines shifting.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    origin: Instant,
    offset: Duration,
}

impl Pacer {
    /// Starts a pacer with virtual zero at the current Tokio instant.
    pub fn start() -> Self {
        Self::starting_at(Duration::ZERO)
    }

    /// Starts a pacer whose current instant is virtual time `now`.
    pub fn starting_at(now: Duration) -> Self {
        Self {
            origin: Instant::now(),
            offset: now,
        }
    }

    /// Current virtual time.
    pub fn elapsed(&self) -> Duration {
        self.offset + Instant::now().saturating_duration_since(self.origin)
    }

    /// Sleeps until the virtual `deadline`.
    ///
    /// With no deadline (nothing armed) this future pends forever, which
    /// leaves the other `select!` branches in charge.
    pub async fn sleep_until(&self, deadline: Option<Duration>) {
        match deadline {
            Some(d) => time::sleep_until(self.origin + d.saturating_sub(self.offset)).await,
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::start()
    }
}
