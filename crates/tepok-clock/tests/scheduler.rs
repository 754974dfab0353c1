//! Integration tests for the virtual-time scheduler and the Tokio pacer.
//!
//! Scheduler tests move time by hand. Pacer tests use
//! `tokio::time::pause()` so sleeps resolve as soon as the clock is
//! advanced.

use std::time::Duration;

use tepok_clock::{Pacer, Scheduler, TimerKind};

// =========================================================================
// Helpers
// =========================================================================

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Drains every timer due up to `until` and returns their kinds in order.
fn drain(clock: &mut Scheduler, until: Duration) -> Vec<TimerKind> {
    let mut kinds = Vec::new();
    while let Some(fired) = clock.pop_due(until) {
        kinds.push(fired.token.kind);
    }
    clock.advance_to(until);
    kinds
}

// =========================================================================
// One-shot timers
// =========================================================================

#[test]
fn test_once_fires_at_deadline_and_clears() {
    let mut clock = Scheduler::new();
    clock.schedule_once(TimerKind::Resolution, ms(2000));

    assert!(clock.pop_due(ms(1999)).is_none());
    let fired = clock.pop_due(ms(2000)).unwrap();
    assert_eq!(fired.at, ms(2000));
    assert_eq!(clock.now(), ms(2000));
    assert!(!clock.is_armed(TimerKind::Resolution));
    assert!(clock.pop_due(ms(10_000)).is_none());
}

#[test]
fn test_pop_due_does_not_move_clock_when_nothing_due() {
    let mut clock = Scheduler::new();
    clock.schedule_once(TimerKind::Countdown, ms(500));
    assert!(clock.pop_due(ms(100)).is_none());
    assert_eq!(clock.now(), Duration::ZERO);
}

// =========================================================================
// Repeating timers
// =========================================================================

#[test]
fn test_repeating_fires_once_per_period() {
    let mut clock = Scheduler::new();
    clock.schedule_repeating(TimerKind::Turn, ms(1000));

    let fired = drain(&mut clock, ms(3500));
    assert_eq!(fired, vec![TimerKind::Turn; 3]);
    assert_eq!(clock.now(), ms(3500));
    assert_eq!(clock.next_deadline(), Some(ms(4000)));
}

#[test]
fn test_repeating_keeps_generation_across_fires() {
    let mut clock = Scheduler::new();
    let token = clock.schedule_repeating(TimerKind::FreezeDecay, ms(100));

    for _ in 0..5 {
        let fired = clock.pop_due(ms(1000)).unwrap();
        assert_eq!(fired.token, token);
    }
    assert!(clock.is_current(token));
}

#[test]
fn test_interleaved_periods_stay_in_time_order() {
    let mut clock = Scheduler::new();
    clock.schedule_repeating(TimerKind::Turn, ms(1000));
    clock.schedule_repeating(TimerKind::FreezeDecay, ms(300));

    let mut last = Duration::ZERO;
    while let Some(fired) = clock.pop_due(ms(3000)) {
        assert!(fired.at >= last, "timers fired out of order");
        last = fired.at;
    }
}

// =========================================================================
// At most one live timer per kind
// =========================================================================

#[test]
fn test_rearm_replaces_instead_of_doubling() {
    let mut clock = Scheduler::new();
    clock.schedule_repeating(TimerKind::Turn, ms(1000));
    clock.advance_to(ms(400));
    clock.schedule_repeating(TimerKind::Turn, ms(1000));

    // Only the replacement ticks: 1.4s and 2.4s.
    let fired = drain(&mut clock, ms(2500));
    assert_eq!(fired.len(), 2);
    assert_eq!(clock.metrics().cancelled, 1);
}

#[test]
fn test_rapid_rearm_cycles_never_compound() {
    let mut clock = Scheduler::new();
    for step in 0..50 {
        clock.advance_to(ms(step * 10));
        clock.schedule_repeating(TimerKind::Turn, ms(1000));
    }
    // Last arm at 0.49s, so exactly one fire by 1.5s.
    assert_eq!(drain(&mut clock, ms(1500)).len(), 1);
}

#[test]
fn test_cancel_makes_token_stale() {
    let mut clock = Scheduler::new();
    let token = clock.schedule_once(TimerKind::Resolution, ms(2000));
    assert!(clock.cancel(TimerKind::Resolution));
    assert!(!clock.is_current(token));
    assert!(drain(&mut clock, ms(5000)).is_empty());
}

#[test]
fn test_cancel_all_disarms_every_kind() {
    let mut clock = Scheduler::new();
    for kind in TimerKind::ALL {
        clock.schedule_once(kind, ms(100));
    }
    clock.cancel_all();
    assert_eq!(clock.next_deadline(), None);
    assert_eq!(clock.metrics().cancelled, 4);
}

#[test]
fn test_advance_to_never_goes_backward() {
    let mut clock = Scheduler::new();
    clock.advance_to(ms(900));
    clock.advance_to(ms(100));
    assert_eq!(clock.now(), ms(900));
}

#[test]
fn test_metrics_count_arms_and_fires() {
    let mut clock = Scheduler::new();
    clock.schedule_once(TimerKind::Countdown, ms(10));
    clock.schedule_repeating(TimerKind::Turn, ms(10));
    drain(&mut clock, ms(30));

    let m = clock.metrics();
    assert_eq!(m.armed, 2);
    assert_eq!(m.fired, 4);
}

// =========================================================================
// Pacer
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_pacer_sleeps_until_virtual_deadline() {
    let pacer = Pacer::start();
    pacer.sleep_until(Some(ms(1500))).await;
    assert!(pacer.elapsed() >= ms(1500));
}

#[tokio::test(start_paused = true)]
async fn test_pacer_without_deadline_pends_forever() {
    let pacer = Pacer::start();
    let result = tokio::time::timeout(Duration::from_secs(60), pacer.sleep_until(None)).await;
    assert!(result.is_err(), "no deadline should pend");
}

#[tokio::test(start_paused = true)]
async fn test_pacer_past_deadline_resolves_immediately() {
    let pacer = Pacer::start();
    tokio::time::advance(ms(3000)).await;
    let result = tokio::time::timeout(ms(1), pacer.sleep_until(Some(ms(1000)))).await;
    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_pacer_starting_at_keeps_virtual_deadlines() {
    let pacer = Pacer::starting_at(ms(10_000));
    assert_eq!(pacer.elapsed(), ms(10_000));

    pacer.sleep_until(Some(ms(10_250))).await;
    assert!(pacer.elapsed() >= ms(10_250));
}
