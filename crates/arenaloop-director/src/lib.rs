//! The event director for Arenaloop.
//!
//! The director cycles a shared session through timed phases forever:
//!
//! ```text
//! Idle (rest countdown) → Check → Select → Warning → Active → Cleanup → Idle …
//! ```
//!
//! Each cycle picks one [`EventModule`] at random from the
//! [`EventRegistry`], loads its arena, moves players in, runs the event,
//! and tears everything down again. A failing module only degrades its
//! own cycle; the loop itself never stops.
//!
//! # Key types
//!
//! - [`Director`]: the state machine and its control loop
//! - [`EventModule`]: the trait independently authored events implement
//! - [`EventRegistry`] / [`ModuleSource`]: isolated module discovery
//! - [`ModuleContext`]: the narrow capability set handed to modules
//! - [`Notifier`], [`LobbyBridge`], [`Roster`]: what the environment provides
//! - [`JoinListener`]: tells late joiners how long the rest has left
//! - [`DirectorConfig`]: rest range, player minimum, enabled modules

mod config;
mod context;
mod director;
mod env;
mod error;
mod join;
mod module;
mod phase;
mod registry;

pub use config::DirectorConfig;
pub use context::ModuleContext;
pub use director::{CycleOutcome, CycleReport, Director, StageOutcome};
pub use env::{LobbyBridge, Notifier, PlayerState, Roster};
pub use error::ModuleError;
pub use join::JoinListener;
pub use module::{EventInfo, EventModule};
pub use phase::{Phase, PhaseSnapshot, RestWindow};
pub use registry::{EventRegistry, LoadFailure, ModuleSource, RegisteredModule};
