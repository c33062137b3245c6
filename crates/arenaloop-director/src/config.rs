//! Director configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Static settings read once at startup.
///
/// Every field has a default, so a configuration file only needs to
/// mention what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Shortest rest between events, in seconds.
    pub rest_min_secs: u64,

    /// Longest rest between events, in seconds. The actual rest is drawn
    /// uniformly from `rest_min_secs..=rest_max_secs` each cycle.
    pub rest_max_secs: u64,

    /// Players required for a cycle to go past the Check step.
    pub min_players: usize,

    /// Delay between loading an arena and moving players into it, giving
    /// the new instance one tick to replicate. Counted inside the warning
    /// duration, not added to it.
    pub arena_settle_ms: u64,

    /// Names of the module sources to load, in order. `None` loads every
    /// source that was supplied.
    pub enabled_modules: Option<Vec<String>>,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            rest_min_secs: 20,
            rest_max_secs: 40,
            min_players: 1,
            arena_settle_ms: 1_000,
            enabled_modules: None,
        }
    }
}

impl DirectorConfig {
    /// Shortest rest the director will take, in seconds.
    pub const MIN_REST_SECS: u64 = 1;

    /// Longest rest the director will take: one day.
    pub const MAX_REST_SECS: u64 = 86_400;

    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// Called by [`Director::new`](crate::Director::new). Rest bounds are
    /// clamped to `MIN_REST_SECS..=MAX_REST_SECS` and an inverted range is
    /// swapped, each with a warning rather than an error.
    pub fn validated(mut self) -> Self {
        for (field, value) in [
            ("rest_min_secs", &mut self.rest_min_secs),
            ("rest_max_secs", &mut self.rest_max_secs),
        ] {
            let clamped = (*value).clamp(Self::MIN_REST_SECS, Self::MAX_REST_SECS);
            if clamped != *value {
                warn!(field, value = *value, clamped, "rest bound out of range, clamping");
                *value = clamped;
            }
        }
        if self.rest_min_secs > self.rest_max_secs {
            warn!(
                min = self.rest_min_secs,
                max = self.rest_max_secs,
                "rest range is inverted, swapping bounds"
            );
            std::mem::swap(&mut self.rest_min_secs, &mut self.rest_max_secs);
        }
        self
    }

    /// A fixed rest of `secs` seconds every cycle.
    pub fn with_fixed_rest(secs: u64) -> Self {
        Self {
            rest_min_secs: secs,
            rest_max_secs: secs,
            ..Default::default()
        }
    }

    pub fn rest_range(&self) -> RangeInclusive<u64> {
        self.rest_min_secs..=self.rest_max_secs
    }

    pub fn arena_settle(&self) -> Duration {
        Duration::from_millis(self.arena_settle_ms)
    }
}
