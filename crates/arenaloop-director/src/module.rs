//! The `EventModule` trait: the extension point for event authors.
//!
//! An event module is one self-contained minigame ("the floor is lava",
//! "king of the hill"). The director never looks inside: it reads the
//! module's [`EventInfo`], optionally loads the arena it names, awaits
//! [`start`](EventModule::start) and then calls
//! [`cleanup`](EventModule::cleanup).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ModuleError;

/// Immutable metadata describing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Shown to players in the warning broadcast.
    pub name: String,

    /// Seconds between the warning broadcast and `start`. Between 1 and
    /// [`EventInfo::MAX_WARNING_SECS`].
    pub warning_duration_secs: u64,
}

impl EventInfo {
    /// Longest warning a module may ask for: one hour.
    pub const MAX_WARNING_SECS: u64 = 3_600;

    pub fn new(name: impl Into<String>, warning_duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            warning_duration_secs,
        }
    }

    pub fn warning_duration(&self) -> Duration {
        Duration::from_secs(self.warning_duration_secs)
    }

    /// Checks the metadata a module reported at registration.
    ///
    /// # Errors
    /// Returns [`ModuleError::InvalidInfo`] for a blank name, a warning
    /// shorter than one second, or one longer than
    /// [`MAX_WARNING_SECS`](Self::MAX_WARNING_SECS).
    pub fn validate(&self) -> Result<(), ModuleError> {
        if self.name.trim().is_empty() {
            return Err(ModuleError::InvalidInfo("event name is blank".into()));
        }
        if self.warning_duration_secs < 1 {
            return Err(ModuleError::InvalidInfo(format!(
                "{} has a warning duration below one second",
                self.name
            )));
        }
        if self.warning_duration_secs > Self::MAX_WARNING_SECS {
            return Err(ModuleError::InvalidInfo(format!(
                "{} asks for a {} s warning, more than the {} s allowed",
                self.name,
                self.warning_duration_secs,
                Self::MAX_WARNING_SECS
            )));
        }
        Ok(())
    }
}

/// The trait event authors implement.
///
/// This is the only thing an event author writes. The director handles
/// the rest: the countdown, the warning broadcast, loading the arena
/// named by [`map_name`](Self::map_name), moving players in and out, and
/// unloading the arena afterwards.
///
/// ## Lifecycle
///
/// ```text
/// loader(ctx) ──→ info() ──→ [registered]
///                               │  picked at random, any number of times
///                               ▼
///               map_name() ──→ start() ──→ cleanup()
/// ```
///
/// Modules are registered once at startup and reused for every cycle in
/// which they are picked, so `start` must be safe to call again after
/// `cleanup`. Any state a module mutates during an event has to be reset
/// in `cleanup`.
///
/// ## Failure containment
///
/// Every call the director makes into a module is guarded. A panic in
/// the loader or in `info` keeps the module out of the registry. A panic
/// in `map_name` means the event runs without an arena. An error or panic
/// from `start` or `cleanup` is logged with the event's name and the
/// cycle carries on, so players are returned and the arena is unloaded
/// either way.
///
/// ## Capabilities
///
/// Modules receive a [`ModuleContext`](crate::ModuleContext) from their
/// loader and keep it for arena access. It is the only handle they get on
/// the rest of the system.
///
/// `Send + Sync + 'static` because one instance is shared, behind an
/// `Arc`, between the director and the tasks running `start`/`cleanup`.
#[async_trait]
pub trait EventModule: Send + Sync + 'static {
    /// The event's metadata. Must return the same value every call.
    fn info(&self) -> EventInfo;

    /// The arena template this event plays in. `None` means the event runs
    /// without an arena of its own. Default: `None`.
    ///
    /// Asked once per cycle, right after the warning broadcast. A name
    /// with no matching template is logged and the event runs without an
    /// arena.
    fn map_name(&self) -> Option<String> {
        None
    }

    /// Runs the event. Resolves when the event is over.
    ///
    /// The director runs this in its own task and waits for it with no
    /// timeout, so a module that never returns stalls the cycle.
    async fn start(&self) -> Result<(), ModuleError>;

    /// Releases anything the module created during `start`. Called after
    /// every `start`, including ones that failed or panicked.
    async fn cleanup(&self) -> Result<(), ModuleError>;
}
