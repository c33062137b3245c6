//! Recording fakes shared by the director integration tests.
//!
//! Every collaborator writes into one [`Journal`], stamped with the
//! (paused) Tokio clock, so tests can assert on the exact order and
//! timing of a cycle.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use arenaloop_arena::{ArenaCatalog, ArenaManager, ArenaSlot, ArenaTemplate, BoundsCache, Region};
use arenaloop_director::{
    Director, DirectorConfig, EventInfo, EventModule, EventRegistry, LobbyBridge, ModuleContext,
    ModuleError, ModuleSource, Notifier, PlayerState, Roster,
};
use arenaloop_protocol::{PlayerId, Recipient, Vec3};
use async_trait::async_trait;
use tokio::time::Instant;

// =========================================================================
// Journal
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RestNotice { to: Recipient, show: bool, secs: u64 },
    Warning { name: String, secs: u64 },
    ArenaLoaded(String),
    ArenaUnloaded,
    StartEvent(Option<String>),
    EndEventBegan,
    EndEventDone,
    ModuleStart(String),
    ModuleCleanup(String),
}

#[derive(Clone)]
pub struct Journal {
    base: Instant,
    entries: Arc<Mutex<Vec<(Duration, Call)>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, call: Call) {
        let at = Instant::now() - self.base;
        self.entries.lock().unwrap().push((at, call));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.entries.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    /// Calls with their time since the journal was created, in whole seconds.
    pub fn timeline(&self) -> Vec<(u64, Call)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(at, c)| (at.as_secs(), c.clone()))
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(|c| pred(c))
    }
}

// =========================================================================
// Collaborators
// =========================================================================

/// Logs arena loads and unloads by looking at the live slot whenever the
/// manager invalidates the cache.
pub struct JournalCache {
    journal: Journal,
    slot: ArenaSlot,
}

impl BoundsCache for JournalCache {
    fn is_inside_region(&self, point: Vec3) -> bool {
        self.slot
            .get()
            .and_then(|arena| arena.region())
            .is_some_and(|r| r.contains(point))
    }

    fn clear_cache(&self) {
        match self.slot.get() {
            Some(arena) => self.journal.push(Call::ArenaLoaded(arena.name.clone())),
            None => self.journal.push(Call::ArenaUnloaded),
        }
    }
}

pub struct RecordingNotifier(pub Journal);

impl Notifier for RecordingNotifier {
    fn broadcast_warning(&self, event_name: &str, duration_secs: u64) {
        self.0.push(Call::Warning {
            name: event_name.to_string(),
            secs: duration_secs,
        });
    }

    fn show_rest_notice(&self, to: Recipient, show: bool, remaining_secs: u64) {
        self.0.push(Call::RestNotice {
            to,
            show,
            secs: remaining_secs,
        });
    }
}

pub struct RecordingBridge {
    pub journal: Journal,
    /// How long `end_event` takes to bring everyone back.
    pub return_time: Duration,
}

#[async_trait]
impl LobbyBridge for RecordingBridge {
    async fn start_event(&self, arena: Option<&str>) {
        self.journal.push(Call::StartEvent(arena.map(str::to_string)));
    }

    async fn end_event(&self) {
        self.journal.push(Call::EndEventBegan);
        tokio::time::sleep(self.return_time).await;
        self.journal.push(Call::EndEventDone);
    }
}

pub struct TestRoster {
    pub players: Mutex<Vec<PlayerState>>,
    /// How long a joining player takes to become ready.
    pub ready_after: Duration,
}

impl TestRoster {
    pub fn with_players(n: u64) -> Self {
        let players = (1..=n)
            .map(|id| PlayerState {
                id: PlayerId(id),
                position: Vec3::ZERO,
                health: 100.0,
            })
            .collect();
        Self {
            players: Mutex::new(players),
            ready_after: Duration::ZERO,
        }
    }
}

#[async_trait]
impl Roster for TestRoster {
    fn players(&self) -> Vec<PlayerState> {
        self.players.lock().unwrap().clone()
    }

    async fn wait_until_ready(&self, _player: PlayerId) -> bool {
        tokio::time::sleep(self.ready_after).await;
        true
    }
}

// =========================================================================
// Scripted event module
// =========================================================================

#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Run for this long, then succeed.
    Run(Duration),
    /// Return an error straight away.
    Fail,
    /// Panic straight away.
    Panic,
}

pub struct ScriptedModule {
    pub name: &'static str,
    pub warning_secs: u64,
    pub map: Option<&'static str>,
    pub map_panics: bool,
    pub start: Script,
    pub cleanup: Script,
    pub journal: Journal,
}

async fn play(script: Script, what: &str) -> Result<(), ModuleError> {
    match script {
        Script::Run(d) => {
            tokio::time::sleep(d).await;
            Ok(())
        }
        Script::Fail => Err(ModuleError::failed(format!("{what} blew up"))),
        Script::Panic => panic!("{what} panicked"),
    }
}

#[async_trait]
impl EventModule for ScriptedModule {
    fn info(&self) -> EventInfo {
        EventInfo::new(self.name, self.warning_secs)
    }

    fn map_name(&self) -> Option<String> {
        if self.map_panics {
            panic!("map lookup exploded");
        }
        self.map.map(str::to_string)
    }

    async fn start(&self) -> Result<(), ModuleError> {
        self.journal.push(Call::ModuleStart(self.name.to_string()));
        play(self.start, "start").await
    }

    async fn cleanup(&self) -> Result<(), ModuleError> {
        self.journal.push(Call::ModuleCleanup(self.name.to_string()));
        play(self.cleanup, "cleanup").await
    }
}

/// Description of one module for [`Harness::build`].
#[derive(Debug, Clone, Copy)]
pub struct ModuleSpec {
    pub name: &'static str,
    pub warning_secs: u64,
    pub map: Option<&'static str>,
    pub map_panics: bool,
    pub start: Script,
    pub cleanup: Script,
}

impl ModuleSpec {
    pub fn new(name: &'static str, warning_secs: u64, map: Option<&'static str>) -> Self {
        Self {
            name,
            warning_secs,
            map,
            map_panics: false,
            start: Script::Run(Duration::from_secs(5)),
            cleanup: Script::Run(Duration::ZERO),
        }
    }

    pub fn start(mut self, script: Script) -> Self {
        self.start = script;
        self
    }

    pub fn cleanup(mut self, script: Script) -> Self {
        self.cleanup = script;
        self
    }

    /// Makes `map_name` panic instead of answering.
    pub fn map_panics(mut self) -> Self {
        self.map_panics = true;
        self
    }
}

// =========================================================================
// Harness
// =========================================================================

pub struct Harness {
    pub director: Director,
    pub journal: Journal,
    pub roster: Arc<TestRoster>,
    pub notifier: Arc<RecordingNotifier>,
    pub ctx: ModuleContext,
}

pub fn catalog() -> ArenaCatalog {
    let floor = Region::from_corners(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 30.0, 50.0));
    ArenaCatalog::from_templates([
        ArenaTemplate::new("Volcano", vec![floor]),
        ArenaTemplate::new("Glacier", vec![floor]),
    ])
    .unwrap()
}

impl Harness {
    pub fn build(config: DirectorConfig, players: u64, modules: &[ModuleSpec]) -> Self {
        Self::build_with_roster(config, TestRoster::with_players(players), modules)
    }

    pub fn build_with_roster(
        config: DirectorConfig,
        roster: TestRoster,
        modules: &[ModuleSpec],
    ) -> Self {
        let journal = Journal::new();
        let roster = Arc::new(roster);

        let mut arenas = ArenaManager::new(catalog());
        let cache = Arc::new(JournalCache {
            journal: journal.clone(),
            slot: arenas.slot(),
        });
        arenas.attach_bounds_cache(cache);
        let ctx = ModuleContext::new(arenas, roster.clone());

        let sources = modules
            .iter()
            .map(|spec| {
                let spec = *spec;
                let journal = journal.clone();
                ModuleSource::from_fn(spec.name, move |_ctx| ScriptedModule {
                    name: spec.name,
                    warning_secs: spec.warning_secs,
                    map: spec.map,
                    map_panics: spec.map_panics,
                    start: spec.start,
                    cleanup: spec.cleanup,
                    journal,
                })
            })
            .collect();
        let registry = EventRegistry::discover(sources, config.enabled_modules.as_deref(), &ctx);

        let notifier = Arc::new(RecordingNotifier(journal.clone()));
        let bridge = Arc::new(RecordingBridge {
            journal: journal.clone(),
            return_time: Duration::from_secs(2),
        });
        let director = Director::new(
            config,
            Arc::new(registry),
            ctx.clone(),
            notifier.clone(),
            bridge,
        )
        .with_seed(7);

        Self {
            director,
            journal,
            roster,
            notifier,
            ctx,
        }
    }
}

/// 25 s fixed rest, one player required, 1 s arena settle.
pub fn scenario_config() -> DirectorConfig {
    DirectorConfig {
        min_players: 1,
        arena_settle_ms: 1_000,
        ..DirectorConfig::with_fixed_rest(25)
    }
}
