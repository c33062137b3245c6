//! Session phases and the rest window published by the director.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The director's current phase.
///
/// ```text
/// Idle → Warning → Active → Cleanup → Idle …
/// ```
///
/// The Check and Select steps run while the phase is still `Idle`; a
/// cycle that fails Check never leaves `Idle` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Resting between events (or deciding whether to start one).
    #[default]
    Idle,
    /// An event has been announced; its arena is loading and players are
    /// being moved in.
    Warning,
    /// The event module's `start` is running.
    Active,
    /// The event is over; the module cleans up and players return.
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Warning => write!(f, "Warning"),
            Self::Active => write!(f, "Active"),
            Self::Cleanup => write!(f, "Cleanup"),
        }
    }
}

// ---------------------------------------------------------------------------
// RestWindow
// ---------------------------------------------------------------------------

/// The interval of an in-progress rest countdown.
///
/// Uses Tokio's clock so paused-time tests see the same instants the
/// director slept on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestWindow {
    pub start: Instant,
    pub end: Instant,
}

impl RestWindow {
    /// A window of `length` starting at `start`. A length past what the
    /// clock can represent ends in the far future instead.
    pub fn new(start: Instant, length: Duration) -> Self {
        Self {
            start,
            end: deadline_after(start, length),
        }
    }

    pub fn length(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    /// Time left at `now`, or `None` if `now` is outside the window.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        if now < self.start || now > self.end {
            return None;
        }
        Some(self.end - now)
    }
}

/// Roughly 30 years. Where a deadline would overflow the clock, we wait
/// this long instead.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `from + after`, saturating to [`FAR_FUTURE`] past `from` on overflow.
pub(crate) fn deadline_after(from: Instant, after: Duration) -> Instant {
    from.checked_add(after)
        .or_else(|| from.checked_add(FAR_FUTURE))
        .unwrap_or(from)
}

/// Whole seconds for a countdown display, rounding partial seconds up.
pub(crate) fn display_secs(d: Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 { secs + 1 } else { secs }
}

// ---------------------------------------------------------------------------
// PhaseSnapshot
// ---------------------------------------------------------------------------

/// What the director publishes on its watch channel whenever the phase
/// changes or a rest window opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseSnapshot {
    pub phase: Phase,
    /// Present only while `phase` is `Idle` and a countdown is running.
    pub rest_window: Option<RestWindow>,
}

impl PhaseSnapshot {
    /// Rest time left at `now`, if a countdown covers that instant.
    pub fn remaining_rest(&self, now: Instant) -> Option<Duration> {
        match (self.phase, self.rest_window) {
            (Phase::Idle, Some(window)) => window.remaining_at(now),
            _ => None,
        }
    }
}
