//! `Orchestrator` builder and run loop.
//!
//! This is the entry point for hosting Arenaloop. It ties together all
//! the layers: arena catalog → arena manager + region cache → module
//! context → registry → director, plus the late-join listener.

use std::sync::Arc;

use arenaloop_arena::ArenaManager;
use arenaloop_director::{
    Director, EventRegistry, JoinListener, LobbyBridge, ModuleContext, ModuleSource, Notifier,
    PhaseSnapshot, Roster,
};
use arenaloop_protocol::PlayerId;
use tokio::sync::{mpsc, watch};

use crate::{ArenaloopError, OrchestratorConfig};

/// Builder for configuring and starting an [`Orchestrator`].
///
/// # Example
///
/// ```rust,ignore
/// let orchestrator = Orchestrator::builder(config)
///     .module(ModuleSource::from_fn("Floor Is Lava", FloorIsLava::new))
///     .notifier(notifier)
///     .bridge(bridge)
///     .roster(roster, joins)
///     .build()?;
/// orchestrator.run().await;
/// ```
pub struct OrchestratorBuilder {
    config: OrchestratorConfig,
    sources: Vec<ModuleSource>,
    notifier: Option<Arc<dyn Notifier>>,
    bridge: Option<Arc<dyn LobbyBridge>>,
    roster: Option<Arc<dyn Roster>>,
    joins: Option<mpsc::UnboundedReceiver<PlayerId>>,
    seed: Option<u64>,
}

impl OrchestratorBuilder {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            notifier: None,
            bridge: None,
            roster: None,
            joins: None,
            seed: None,
        }
    }

    /// Adds an event module source. Sources load in `build`, each isolated
    /// from the others.
    pub fn module(mut self, source: ModuleSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn modules(mut self, sources: impl IntoIterator<Item = ModuleSource>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn bridge(mut self, bridge: Arc<dyn LobbyBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Sets the roster and the channel on which it reports joining players.
    pub fn roster(
        mut self,
        roster: Arc<dyn Roster>,
        joins: mpsc::UnboundedReceiver<PlayerId>,
    ) -> Self {
        self.roster = Some(roster);
        self.joins = Some(joins);
        self
    }

    /// Seeds rest lengths and event selection, for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Wires everything and loads the event modules.
    ///
    /// Module load failures are not errors here: they are logged and the
    /// orchestrator runs with whatever loaded, possibly nothing.
    ///
    /// # Errors
    /// Returns [`ArenaloopError::MissingCollaborator`] if no notifier,
    /// bridge, or roster was set, and [`ArenaloopError::Arena`] if an arena
    /// template in the configuration is invalid.
    pub fn build(self) -> Result<Orchestrator, ArenaloopError> {
        let notifier = self
            .notifier
            .ok_or(ArenaloopError::MissingCollaborator("notifier"))?;
        let bridge = self
            .bridge
            .ok_or(ArenaloopError::MissingCollaborator("lobby bridge"))?;
        let roster = self
            .roster
            .ok_or(ArenaloopError::MissingCollaborator("roster"))?;
        let joins = self
            .joins
            .ok_or(ArenaloopError::MissingCollaborator("join channel"))?;

        let mut arenas = ArenaManager::new(self.config.catalog()?);
        let cache = Arc::new(arenas.region_cache());
        arenas.attach_bounds_cache(cache);
        let ctx = ModuleContext::new(arenas, Arc::clone(&roster));

        let registry = EventRegistry::discover(
            self.sources,
            self.config.director.enabled_modules.as_deref(),
            &ctx,
        );
        if registry.is_empty() {
            tracing::warn!("no event modules loaded, the director will only rest");
        }

        let mut director = Director::new(
            self.config.director,
            Arc::new(registry),
            ctx,
            Arc::clone(&notifier),
            bridge,
        );
        if let Some(seed) = self.seed {
            director = director.with_seed(seed);
        }
        let listener = JoinListener::new(director.subscribe(), roster, notifier);

        Ok(Orchestrator {
            director,
            listener,
            joins,
        })
    }
}

/// A fully wired orchestrator, ready to run.
pub struct Orchestrator {
    director: Director,
    listener: JoinListener,
    joins: mpsc::UnboundedReceiver<PlayerId>,
}

impl Orchestrator {
    pub fn builder(config: OrchestratorConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    /// Phase updates, for hosts that want to show or log them.
    pub fn subscribe(&self) -> watch::Receiver<PhaseSnapshot> {
        self.director.subscribe()
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    /// Starts the late-join listener and runs the director.
    ///
    /// Never returns; drop the future (for example from a `select!` on a
    /// shutdown signal) to stop.
    pub async fn run(self) {
        let Self {
            director,
            listener,
            joins,
        } = self;
        let listener_task = tokio::spawn(listener.run(joins));
        // Stops the listener when this future is dropped.
        let _guard = AbortOnDrop(listener_task);
        tracing::info!(modules = director.registry().len(), "orchestrator running");
        director.run().await;
    }
}

struct AbortOnDrop(tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
