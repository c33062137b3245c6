//! Integration tests for arena loading, unloading, and cache invalidation.

use std::sync::{Arc, Mutex};

use arenaloop_arena::{
    ArenaCatalog, ArenaError, ArenaManager, ArenaSlot, ArenaTemplate, BoundsCache, Region,
};
use arenaloop_protocol::Vec3;

// =========================================================================
// Helpers
// =========================================================================

/// Records every clear together with what the manager had live at that
/// moment, so tests can check that invalidation follows the world change.
#[derive(Default)]
struct RecordingCache {
    clears: Mutex<Vec<Option<String>>>,
    manager_view: Mutex<Option<ArenaSlot>>,
}

impl RecordingCache {
    fn clears(&self) -> Vec<Option<String>> {
        self.clears.lock().unwrap().clone()
    }
}

impl BoundsCache for RecordingCache {
    fn is_inside_region(&self, _point: Vec3) -> bool {
        false
    }

    fn clear_cache(&self) {
        let live = self
            .manager_view
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|slot| slot.get())
            .map(|arena| arena.name.clone());
        self.clears.lock().unwrap().push(live);
    }
}

fn floor(size: f32) -> Region {
    Region::from_corners(Vec3::new(-size, 0.0, -size), Vec3::new(size, 20.0, size))
}

fn catalog() -> ArenaCatalog {
    ArenaCatalog::from_templates([
        ArenaTemplate::new("Volcano", vec![floor(50.0)]),
        ArenaTemplate::new("Glacier", vec![floor(10.0), floor(30.0)]),
    ])
    .unwrap()
}

/// A manager whose recording cache can observe the live slot.
fn manager_with_recorder() -> (ArenaManager, Arc<RecordingCache>) {
    let mut mgr = ArenaManager::new(catalog());
    let recorder = Arc::new(RecordingCache::default());
    *recorder.manager_view.lock().unwrap() = Some(mgr.slot());
    mgr.attach_bounds_cache(recorder.clone());
    (mgr, recorder)
}

// =========================================================================
// load_arena
// =========================================================================

#[test]
fn test_load_arena_known_template_becomes_live() {
    let mut mgr = ArenaManager::new(catalog());
    let id = mgr.load_arena("Volcano").unwrap();

    let live = mgr.current().expect("arena should be live");
    assert_eq!(live.id, id);
    assert_eq!(live.name, "Volcano");
    assert!(mgr.is_loaded());
}

#[test]
fn test_load_arena_twice_leaves_only_second_live() {
    let mut mgr = ArenaManager::new(catalog());
    let first = mgr.load_arena("Volcano").unwrap();
    let second = mgr.load_arena("Glacier").unwrap();

    assert_ne!(first, second);
    let live = mgr.current().unwrap();
    assert_eq!(live.id, second);
    assert_eq!(live.name, "Glacier");
}

#[test]
fn test_load_arena_same_template_twice_gets_fresh_id() {
    let mut mgr = ArenaManager::new(catalog());
    let first = mgr.load_arena("Volcano").unwrap();
    let second = mgr.load_arena("Volcano").unwrap();
    assert_ne!(first, second);
    assert_eq!(mgr.current().unwrap().id, second);
}

#[test]
fn test_load_arena_unknown_template_leaves_no_arena() {
    let mut mgr = ArenaManager::new(catalog());
    mgr.load_arena("Volcano").unwrap();

    let result = mgr.load_arena("Atlantis");
    assert!(matches!(result, Err(ArenaError::TemplateNotFound(ref n)) if n == "Atlantis"));
    assert!(!mgr.is_loaded());
}

// =========================================================================
// unload_arena
// =========================================================================

#[test]
fn test_unload_arena_when_none_live_is_noop() {
    let (mut mgr, recorder) = manager_with_recorder();
    assert_eq!(mgr.unload_arena(), None);
    assert_eq!(mgr.unload_arena(), None);
    assert!(recorder.clears().is_empty());
}

#[test]
fn test_unload_arena_returns_destroyed_id() {
    let mut mgr = ArenaManager::new(catalog());
    let id = mgr.load_arena("Glacier").unwrap();
    assert_eq!(mgr.unload_arena(), Some(id));
    assert!(mgr.current().is_none());
}

// =========================================================================
// Cache invalidation protocol
// =========================================================================

#[test]
fn test_cache_cleared_once_per_load_after_world_change() {
    let (mut mgr, recorder) = manager_with_recorder();
    mgr.load_arena("Volcano").unwrap();

    // Cleared exactly once, and the new arena was already live.
    assert_eq!(recorder.clears(), vec![Some("Volcano".to_string())]);
}

#[test]
fn test_cache_cleared_once_per_unload_after_world_change() {
    let (mut mgr, recorder) = manager_with_recorder();
    mgr.load_arena("Volcano").unwrap();
    mgr.unload_arena();

    assert_eq!(recorder.clears(), vec![Some("Volcano".to_string()), None]);
}

#[test]
fn test_cache_cleared_for_replaced_arena_and_new_arena() {
    let (mut mgr, recorder) = manager_with_recorder();
    mgr.load_arena("Volcano").unwrap();
    mgr.load_arena("Glacier").unwrap();

    assert_eq!(
        recorder.clears(),
        vec![
            Some("Volcano".to_string()),
            None,
            Some("Glacier".to_string()),
        ]
    );
}

#[test]
fn test_failed_lookup_clears_only_for_destroyed_arena() {
    let (mut mgr, recorder) = manager_with_recorder();
    let _ = mgr.load_arena("Atlantis");
    assert!(recorder.clears().is_empty());

    mgr.load_arena("Volcano").unwrap();
    let _ = mgr.load_arena("Atlantis");
    assert_eq!(recorder.clears(), vec![Some("Volcano".to_string()), None]);
}

// =========================================================================
// RegionCache against the live arena
// =========================================================================

#[test]
fn test_region_cache_answers_for_live_arena() {
    let mut mgr = ArenaManager::new(catalog());
    let cache = Arc::new(mgr.region_cache());
    mgr.attach_bounds_cache(cache.clone());

    assert!(!cache.is_inside_region(Vec3::ZERO), "no arena yet");

    mgr.load_arena("Volcano").unwrap();
    assert!(cache.is_inside_region(Vec3::new(40.0, 5.0, -40.0)));
    assert!(!cache.is_inside_region(Vec3::new(60.0, 5.0, 0.0)));
}

#[test]
fn test_region_cache_never_answers_for_destroyed_arena() {
    let mut mgr = ArenaManager::new(catalog());
    let cache = Arc::new(mgr.region_cache());
    mgr.attach_bounds_cache(cache.clone());

    mgr.load_arena("Volcano").unwrap();
    let inside_volcano = Vec3::new(45.0, 1.0, 45.0);
    assert!(cache.is_inside_region(inside_volcano));

    mgr.load_arena("Glacier").unwrap();
    assert!(!cache.is_inside_region(inside_volcano));
    assert!(cache.is_inside_region(Vec3::new(25.0, 1.0, 25.0)));

    mgr.unload_arena();
    assert!(!cache.is_inside_region(Vec3::new(25.0, 1.0, 25.0)));
}

#[test]
fn test_region_cache_detached_goes_stale() {
    // Without the manager's invalidation the cache keeps its old answer,
    // which is exactly what attaching it prevents.
    let mut mgr = ArenaManager::new(catalog());
    let cache = mgr.region_cache();

    mgr.load_arena("Volcano").unwrap();
    assert!(cache.is_inside_region(Vec3::new(45.0, 1.0, 45.0)));
    assert!(cache.is_warm());

    mgr.unload_arena();
    assert!(cache.is_inside_region(Vec3::new(45.0, 1.0, 45.0)));

    cache.clear_cache();
    assert!(!cache.is_warm());
    assert!(!cache.is_inside_region(Vec3::new(45.0, 1.0, 45.0)));
}

#[test]
fn test_register_template_after_construction() {
    let mut mgr = ArenaManager::default();
    assert!(mgr.load_arena("Dunes").is_err());

    mgr.register_template(ArenaTemplate::new("Dunes", vec![floor(5.0)]))
        .unwrap();
    assert!(mgr.catalog().contains("Dunes"));
    assert!(mgr.load_arena("Dunes").is_ok());
}
