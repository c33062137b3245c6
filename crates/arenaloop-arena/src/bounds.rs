//! The spatial-bounds cache contract and its default implementation.

use std::sync::{Mutex, PoisonError};

use arenaloop_protocol::Vec3;

use crate::{ArenaSlot, Region};

/// Answers "is this point inside the live arena's playable region".
///
/// Implementations may cache whatever geometry they derive from the live
/// arena. [`clear_cache`](Self::clear_cache) is called by the arena
/// manager after every load and unload, once the world has changed, so
/// a cache must never keep answering from geometry older than the last
/// clear.
///
/// # Lifecycle
///
/// ```text
///   load/unload ─► clear_cache ─► (cold) ─► first query computes ─► (warm)
///        ▲                                                            │
///        └──────────────────── next load/unload ◄────────────────────┘
/// ```
///
/// Queries come from event modules while an event runs, often once per
/// player per tick, so an implementation should make the warm path cheap.
/// With no live arena every point is outside.
pub trait BoundsCache: Send + Sync {
    /// Whether `point` lies inside the live arena's playable region.
    fn is_inside_region(&self, point: Vec3) -> bool;

    /// Forget everything derived from the previous arena. Must not block
    /// on a query in progress for longer than that query takes.
    fn clear_cache(&self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CacheState {
    /// Nothing computed since the last clear.
    Cold,
    /// Region of the arena that was live at computation time. `None` when
    /// there was no arena or it had no geometry.
    Warm(Option<Region>),
}

/// Default [`BoundsCache`]: computes the live arena's enclosing region on
/// the first query after a clear and reuses it until the next clear.
#[derive(Debug)]
pub struct RegionCache {
    slot: ArenaSlot,
    state: Mutex<CacheState>,
}

impl RegionCache {
    pub fn new(slot: ArenaSlot) -> Self {
        Self {
            slot,
            state: Mutex::new(CacheState::Cold),
        }
    }

    /// The cached region, computing it if the cache is cold.
    pub fn region(&self) -> Option<Region> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            CacheState::Warm(region) => region,
            CacheState::Cold => {
                let region = self.slot.get().and_then(|arena| arena.region());
                tracing::trace!(?region, "bounds cache recomputed");
                *state = CacheState::Warm(region);
                region
            }
        }
    }

    /// Whether a region has been computed since the last clear.
    pub fn is_warm(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            CacheState::Warm(_)
        )
    }
}

impl BoundsCache for RegionCache {
    fn is_inside_region(&self, point: Vec3) -> bool {
        self.region().is_some_and(|r| r.contains(point))
    }

    fn clear_cache(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = CacheState::Cold;
    }
}
