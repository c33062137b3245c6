//! The director: a forever-running state machine over event cycles.
//!
//! One cycle, in order:
//!
//! 1. **Idle**: draw a rest length, announce it, sleep, hide the notice.
//! 2. **Check**: enough players and at least one module? If not, back to 1.
//! 3. **Select**: pick a module uniformly at random.
//! 4. **Warning**: broadcast the event, load its arena, let it settle,
//!    move players in, wait out the rest of the warning.
//! 5. **Active**: run the module's `start` as a task and await it.
//! 6. **Cleanup**: run `cleanup`, bring players back to the lobby, unload
//!    the arena.
//!
//! Steps 5 and 6 always run to the end: a module error or panic is
//! logged and the cycle carries on, so players are always returned and
//! the arena is always unloaded.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use arenaloop_protocol::{ArenaId, Recipient};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::phase::deadline_after;
use crate::{
    DirectorConfig, EventModule, EventRegistry, LobbyBridge, ModuleContext, ModuleError,
    Notifier, Phase, PhaseSnapshot, RestWindow, Roster,
};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How one module call (`start` or `cleanup`) ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// The module returned an error.
    Failed(String),
    /// The module panicked.
    Panicked(String),
    /// The module's task was cancelled before it finished.
    Cancelled(String),
}

impl StageOutcome {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// What happened in a cycle that ran an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub event: String,
    /// The arena loaded for this event, if the module named one and the
    /// template existed.
    pub arena: Option<ArenaId>,
    pub start: StageOutcome,
    pub cleanup: StageOutcome,
}

/// Result of a single pass through [`Director::run_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Check failed on the player count.
    NotEnoughPlayers { have: usize, need: usize },
    /// Check failed because the registry is empty.
    NoModules,
    /// An event ran through Warning, Active and Cleanup.
    Completed(CycleReport),
}

// ---------------------------------------------------------------------------
// Director
// ---------------------------------------------------------------------------

/// The orchestration core.
///
/// Owns the phase; everything else only observes it through
/// [`subscribe`](Self::subscribe).
pub struct Director {
    config: DirectorConfig,
    registry: Arc<EventRegistry>,
    ctx: ModuleContext,
    notifier: Arc<dyn Notifier>,
    bridge: Arc<dyn LobbyBridge>,
    phase_tx: watch::Sender<PhaseSnapshot>,
    rng: StdRng,
}

impl Director {
    /// Creates a director in the Idle phase.
    ///
    /// `ctx` should be the same context the registry's modules were loaded
    /// with, so the director and the modules share one arena manager.
    pub fn new(
        config: DirectorConfig,
        registry: Arc<EventRegistry>,
        ctx: ModuleContext,
        notifier: Arc<dyn Notifier>,
        bridge: Arc<dyn LobbyBridge>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(PhaseSnapshot::default());
        Self {
            config: config.validated(),
            registry,
            ctx,
            notifier,
            bridge,
            phase_tx,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeds the random source used for rest lengths and event selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// A receiver that always holds the latest [`PhaseSnapshot`].
    pub fn subscribe(&self) -> watch::Receiver<PhaseSnapshot> {
        self.phase_tx.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.phase_tx.borrow().phase
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// Runs cycles until the process ends.
    pub async fn run(mut self) {
        info!(
            modules = self.registry.len(),
            min_players = self.config.min_players,
            rest_min_secs = self.config.rest_min_secs,
            rest_max_secs = self.config.rest_max_secs,
            "director running"
        );
        loop {
            let outcome = self.run_cycle().await;
            debug!(?outcome, "cycle finished");
        }
    }

    /// Runs one cycle: a rest, then either an event or a return to Idle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.rest().await;

        // -- Check --
        let have = self.ctx.roster().player_count();
        let need = self.config.min_players;
        if have < need {
            debug!(have, need, "not enough players, staying idle");
            return CycleOutcome::NotEnoughPlayers { have, need };
        }

        // -- Select --
        let Some(picked) = self.registry.choose(&mut self.rng) else {
            debug!("no event modules registered, staying idle");
            return CycleOutcome::NoModules;
        };
        let module = Arc::clone(picked.module());
        let event = picked.info().clone();
        info!(event = %event.name, players = have, "event selected");

        // -- Warning --
        self.publish(Phase::Warning, None);
        let deadline = deadline_after(Instant::now(), event.warning_duration());
        self.notifier
            .broadcast_warning(&event.name, event.warning_duration_secs);

        let map = resolve_map(&event.name, module.as_ref());
        let arena = match map.as_deref() {
            Some(name) => match self.ctx.load_arena(name).await {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(event = %event.name, error = %err, "event arena unavailable, running without it");
                    None
                }
            },
            None => None,
        };
        if arena.is_some() {
            let settle = deadline_after(Instant::now(), self.config.arena_settle());
            time::sleep_until(settle.min(deadline)).await;
        }
        let destination = if arena.is_some() { map.as_deref() } else { None };
        self.bridge.start_event(destination).await;
        time::sleep_until(deadline).await;

        // -- Active --
        self.publish(Phase::Active, None);
        info!(event = %event.name, "event started");
        let start = {
            let module = Arc::clone(&module);
            supervise(&event.name, "start", tokio::spawn(async move { module.start().await }))
                .await
        };

        // -- Cleanup --
        self.publish(Phase::Cleanup, None);
        let cleanup = {
            let module = Arc::clone(&module);
            supervise(&event.name, "cleanup", tokio::spawn(async move { module.cleanup().await }))
                .await
        };
        self.bridge.end_event().await;
        self.ctx.unload_arena().await;
        self.publish(Phase::Idle, None);

        info!(
            event = %event.name,
            degraded = start.is_degraded() || cleanup.is_degraded(),
            "event finished"
        );
        CycleOutcome::Completed(CycleReport {
            event: event.name,
            arena,
            start,
            cleanup,
        })
    }

    async fn rest(&mut self) {
        let secs = self.rng.random_range(self.config.rest_range());
        let window = RestWindow::new(Instant::now(), Duration::from_secs(secs));

        self.publish(Phase::Idle, Some(window));
        self.notifier.show_rest_notice(Recipient::All, true, secs);
        debug!(rest_secs = secs, "resting");

        time::sleep_until(window.end).await;

        self.publish(Phase::Idle, None);
        self.notifier.show_rest_notice(Recipient::All, false, 0);
    }

    fn publish(&self, phase: Phase, rest_window: Option<RestWindow>) {
        let previous = self.phase_tx.send_replace(PhaseSnapshot { phase, rest_window });
        if previous.phase != phase {
            debug!(from = %previous.phase, to = %phase, "phase changed");
        }
    }
}

/// Awaits a module task, containing whatever went wrong inside it.
async fn supervise(
    event: &str,
    stage: &'static str,
    task: JoinHandle<Result<(), ModuleError>>,
) -> StageOutcome {
    match task.await {
        Ok(Ok(())) => StageOutcome::Completed,
        Ok(Err(err)) => {
            warn!(event, stage, error = %err, "event module failed");
            StageOutcome::Failed(err.to_string())
        }
        Err(join_err) if join_err.is_panic() => {
            let err = ModuleError::from_panic(join_err.into_panic());
            error!(event, stage, error = %err, "event module panicked");
            StageOutcome::Panicked(err.to_string())
        }
        Err(join_err) => {
            warn!(event, stage, error = %join_err, "event module task cancelled");
            StageOutcome::Cancelled(join_err.to_string())
        }
    }
}

/// Asks the module for its arena. A panic counts as "no arena".
fn resolve_map(event: &str, module: &dyn EventModule) -> Option<String> {
    match catch_unwind(AssertUnwindSafe(|| module.map_name())) {
        Ok(map) => map,
        Err(payload) => {
            let err = ModuleError::from_panic(payload);
            warn!(
                event,
                error = %err,
                "event module panicked naming its arena, running without one"
            );
            None
        }
    }
}
