//! The capability set handed to event modules.

use std::sync::Arc;

use arenaloop_arena::{ArenaError, ArenaManager, BoundsCache, LiveArena};
use arenaloop_protocol::ArenaId;
use tokio::sync::Mutex;

use crate::Roster;

/// What an event module may do to the world outside itself.
///
/// Every module gets a clone at registration time. The context exposes
/// arena loading, arena unloading, and one roster query; nothing else of
/// the director is reachable from a module.
///
/// Cheap to clone: all fields are `Arc`s.
#[derive(Clone)]
pub struct ModuleContext {
    arenas: Arc<Mutex<ArenaManager>>,
    roster: Arc<dyn Roster>,
    bounds: Option<Arc<dyn BoundsCache>>,
}

impl ModuleContext {
    /// Builds a context over a shared arena manager.
    ///
    /// The bounds cache used by
    /// [`any_player_alive_in_arena`](Self::any_player_alive_in_arena) is
    /// taken from the manager's attached cache, so attach it before
    /// building the context.
    pub fn new(arenas: ArenaManager, roster: Arc<dyn Roster>) -> Self {
        let bounds = arenas.bounds_cache();
        Self {
            arenas: Arc::new(Mutex::new(arenas)),
            roster,
            bounds,
        }
    }

    /// Replaces the live arena with a fresh instance of `name`.
    ///
    /// # Errors
    /// Returns [`ArenaError::TemplateNotFound`] if there is no such
    /// template; no arena is live afterwards.
    pub async fn load_arena(&self, name: &str) -> Result<ArenaId, ArenaError> {
        self.arenas.lock().await.load_arena(name)
    }

    /// Destroys the live arena, if any. Safe to call when none is live.
    pub async fn unload_arena(&self) -> Option<ArenaId> {
        self.arenas.lock().await.unload_arena()
    }

    /// Whether at least one player with positive health is inside the
    /// live arena's region.
    ///
    /// Without a bounds cache this answers `true`, so an event that ends
    /// "when everyone is out" keeps running rather than stopping early.
    pub fn any_player_alive_in_arena(&self) -> bool {
        let Some(bounds) = &self.bounds else {
            return true;
        };
        self.roster
            .players()
            .iter()
            .any(|p| p.is_alive() && bounds.is_inside_region(p.position))
    }

    /// The live arena, if any.
    pub async fn current_arena(&self) -> Option<Arc<LiveArena>> {
        self.arenas.lock().await.current()
    }

    pub(crate) fn roster(&self) -> &Arc<dyn Roster> {
        &self.roster
    }
}
