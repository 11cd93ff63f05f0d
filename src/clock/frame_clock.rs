use std::time::Duration;

use crate::foundation::core::TickRate;

/// Lifecycle state of a [`FrameClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    /// Created but never started.
    Idle,
    /// Accepting tick opportunities.
    Running,
    /// Stopped; opportunities are rejected until restarted.
    Stopped,
}

/// Why an opportunity did not fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Less than one interval elapsed since the last accepted tick.
    TooEarly,
    /// The previous tick has not signalled completion yet.
    Busy,
}

/// Outcome of offering one scheduling opportunity to the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickDecision {
    /// Run the tick now, then call [`FrameClock::complete`].
    Fire,
    /// Re-schedule without running the tick.
    Skip(SkipReason),
    /// The clock is not running; the host should stop scheduling opportunities.
    Halted,
}

/// Drift-correcting frame clock.
///
/// The clock is host-agnostic: it holds no timer of its own. The host offers
/// it a scheduling opportunity once per redraw via
/// [`on_opportunity`](Self::on_opportunity), passing monotonic `now` values
/// (real or simulated), and runs the tick itself when the decision is
/// [`TickDecision::Fire`].
///
/// Two guarantees:
///
/// - **Pacing**: a tick fires only when at least one interval has elapsed
///   since the last accepted tick, and the internal phase mark advances by a
///   whole number of intervals (`elapsed - elapsed % interval`), so the
///   long-term average rate converges on the target even when individual
///   opportunities jitter.
/// - **At most one in-flight tick**: after `Fire`, further opportunities skip
///   with [`SkipReason::Busy`] until [`complete`](Self::complete) is called.
///
/// Throughput accounting ([`observed_rate`](Self::observed_rate)) is purely
/// informational and never feeds back into scheduling.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    state: ClockState,
    last_tick: Option<Duration>,
    started_at: Option<Duration>,
    in_flight: bool,
    accepted: u64,
    skipped: u64,
}

impl FrameClock {
    /// Create a clock for the given target rate.
    ///
    /// Invalid rates are rejected by [`TickRate::new`], so a constructed
    /// clock always has a positive interval.
    pub fn new(rate: TickRate) -> Self {
        Self {
            interval: rate.interval(),
            state: ClockState::Idle,
            last_tick: None,
            started_at: None,
            in_flight: false,
            accepted: 0,
            skipped: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Tick interval derived from the target rate.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start (or restart) accepting opportunities. Counters reset; the first
    /// accepted opportunity fires immediately and anchors the phase.
    pub fn start(&mut self) {
        if self.state == ClockState::Running {
            return;
        }
        self.state = ClockState::Running;
        self.last_tick = None;
        self.started_at = None;
        self.in_flight = false;
        self.accepted = 0;
        self.skipped = 0;
    }

    /// Stop the clock. Idempotent, and safe to call while a tick is in
    /// flight: the pending completion is still accepted, but every later
    /// opportunity yields [`TickDecision::Halted`].
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    /// Offer one scheduling opportunity at monotonic time `now`.
    pub fn on_opportunity(&mut self, now: Duration) -> TickDecision {
        if self.state != ClockState::Running {
            return TickDecision::Halted;
        }
        if self.in_flight {
            self.skipped += 1;
            return TickDecision::Skip(SkipReason::Busy);
        }

        let Some(last) = self.last_tick else {
            self.started_at = Some(now);
            self.last_tick = Some(now);
            self.in_flight = true;
            self.accepted += 1;
            return TickDecision::Fire;
        };

        let elapsed = now.saturating_sub(last);
        if elapsed < self.interval {
            self.skipped += 1;
            return TickDecision::Skip(SkipReason::TooEarly);
        }

        // Advance the phase mark by a whole number of intervals, not to `now`,
        // so jitter in individual opportunities does not accumulate as drift.
        let interval_ns = self.interval.as_nanos();
        let advance_ns = (elapsed.as_nanos() / interval_ns) * interval_ns;
        self.last_tick = Some(last + Duration::from_nanos(advance_ns as u64));
        self.in_flight = true;
        self.accepted += 1;
        TickDecision::Fire
    }

    /// Signal that the tick started by the last [`TickDecision::Fire`] has
    /// completed. No-op when nothing is in flight.
    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    /// Ticks accepted since the last start.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Opportunities skipped since the last start (pacing and busy skips).
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Observed throughput in accepted ticks per wall-clock second, measured
    /// since the first accepted tick. Informational only.
    pub fn observed_rate(&self, now: Duration) -> f64 {
        let Some(started) = self.started_at else {
            return 0.0;
        };
        let secs = now.saturating_sub(started).as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.accepted as f64 / secs
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/frame_clock.rs"]
mod tests;
