//! Arena manager: instantiates templates and owns the live arena.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use arenaloop_protocol::ArenaId;

use crate::{ArenaCatalog, ArenaError, ArenaTemplate, BoundsCache, Region, RegionCache};

/// Counter for generating unique arena instance IDs.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// LiveArena
// ---------------------------------------------------------------------------

/// An arena that has been cloned out of its template into the live world.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveArena {
    /// Fresh for every load, even of the same template.
    pub id: ArenaId,
    /// Name of the template this arena was cloned from.
    pub name: String,
    /// Geometry copied from the template at load time.
    pub parts: Vec<Region>,
}

impl LiveArena {
    fn instantiate(template: &ArenaTemplate) -> Self {
        Self {
            id: ArenaId(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed)),
            name: template.name.clone(),
            parts: template.parts.clone(),
        }
    }

    /// The playable region: the box enclosing every part, or `None` for an
    /// arena without geometry.
    pub fn region(&self) -> Option<Region> {
        Region::enclosing(&self.parts)
    }
}

// ---------------------------------------------------------------------------
// ArenaSlot
// ---------------------------------------------------------------------------

/// Shared, read-mostly view of "which arena is live right now".
///
/// Only [`ArenaManager`] writes to the slot. Readers (the region cache)
/// hold a clone and take short read locks.
#[derive(Debug, Clone, Default)]
pub struct ArenaSlot {
    inner: Arc<RwLock<Option<Arc<LiveArena>>>>,
}

impl ArenaSlot {
    /// The live arena, if any.
    pub fn get(&self) -> Option<Arc<LiveArena>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, arena: Option<Arc<LiveArena>>) -> Option<Arc<LiveArena>> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, arena)
    }
}

// ---------------------------------------------------------------------------
// ArenaManager
// ---------------------------------------------------------------------------

/// Loads and unloads arenas. At most one arena is live at any time.
///
/// The manager is the only writer of the live-arena slot. Every
/// transition that changes the world (a successful load, an unload of a
/// live arena) is followed by exactly one [`BoundsCache::clear_cache`]
/// call, made after the slot has been updated.
pub struct ArenaManager {
    catalog: ArenaCatalog,
    live: ArenaSlot,
    bounds: Option<Arc<dyn BoundsCache>>,
}

impl ArenaManager {
    /// Creates a manager with no live arena and no bounds cache attached.
    pub fn new(catalog: ArenaCatalog) -> Self {
        Self {
            catalog,
            live: ArenaSlot::default(),
            bounds: None,
        }
    }

    /// Attaches the cache to invalidate on every world change.
    pub fn attach_bounds_cache(&mut self, cache: Arc<dyn BoundsCache>) {
        self.bounds = Some(cache);
    }

    /// Builds the default [`RegionCache`] reading from this manager's slot.
    ///
    /// The cache is not attached automatically; pass it to
    /// [`attach_bounds_cache`](Self::attach_bounds_cache).
    pub fn region_cache(&self) -> RegionCache {
        RegionCache::new(self.slot())
    }

    /// A read-only handle on the live-arena slot.
    pub fn slot(&self) -> ArenaSlot {
        self.live.clone()
    }

    /// The attached bounds cache, if any.
    pub fn bounds_cache(&self) -> Option<Arc<dyn BoundsCache>> {
        self.bounds.clone()
    }

    /// Replaces the live arena with a fresh clone of the named template.
    ///
    /// Any live arena is destroyed first, even when the lookup then fails,
    /// so after this call either the new arena is live or none is.
    ///
    /// # Errors
    /// Returns [`ArenaError::TemplateNotFound`] if the catalog has no
    /// template with this name.
    pub fn load_arena(&mut self, name: &str) -> Result<ArenaId, ArenaError> {
        self.unload_arena();

        let Some(template) = self.catalog.get(name) else {
            tracing::warn!(arena = %name, "arena template not found, no arena loaded");
            return Err(ArenaError::TemplateNotFound(name.to_string()));
        };

        let arena = Arc::new(LiveArena::instantiate(template));
        let id = arena.id;
        let parts = arena.parts.len();
        self.live.replace(Some(arena));
        self.invalidate_bounds();

        tracing::info!(arena = %name, arena_id = %id, parts, "arena loaded");
        Ok(id)
    }

    /// Destroys the live arena, if any.
    ///
    /// Returns the id of the destroyed arena. A no-op returning `None`
    /// when nothing is live.
    pub fn unload_arena(&mut self) -> Option<ArenaId> {
        let previous = self.live.replace(None)?;
        self.invalidate_bounds();
        tracing::info!(arena = %previous.name, arena_id = %previous.id, "arena unloaded");
        Some(previous.id)
    }

    /// The live arena, if any.
    pub fn current(&self) -> Option<Arc<LiveArena>> {
        self.live.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    pub fn catalog(&self) -> &ArenaCatalog {
        &self.catalog
    }

    /// Adds or replaces a template after construction.
    ///
    /// # Errors
    /// Returns [`ArenaError::InvalidTemplate`] for a blank template name.
    pub fn register_template(&mut self, template: ArenaTemplate) -> Result<(), ArenaError> {
        self.catalog.insert(template)
    }

    fn invalidate_bounds(&self) {
        if let Some(cache) = &self.bounds {
            cache.clear_cache();
        }
    }
}

impl Default for ArenaManager {
    fn default() -> Self {
        Self::new(ArenaCatalog::default())
    }
}
