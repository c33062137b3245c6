//! # Arenaloop
//!
//! Live-service event orchestrator for shared multiplayer sessions.
//!
//! Arenaloop keeps a session cycling through timed phases forever: a rest
//! countdown, then a randomly chosen event with its own arena, then
//! cleanup and back to rest. Event authors implement a single
//! [`EventModule`] trait; the host supplies how notices reach players
//! ([`Notifier`]), how players move between lobby and arena
//! ([`LobbyBridge`]), and who is connected ([`Roster`]).
//!
//! This crate re-exports the layers and adds what a host needs to get
//! running: a JSON configuration file, in-memory collaborators, and the
//! [`Orchestrator`] that wires everything together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use arenaloop::prelude::*;
//!
//! # struct MyBridge;
//! # #[async_trait::async_trait]
//! # impl LobbyBridge for MyBridge {
//! #     async fn start_event(&self, _arena: Option<&str>) {}
//! #     async fn end_event(&self) {}
//! # }
//! # async fn demo() -> Result<(), ArenaloopError> {
//! let config = OrchestratorConfig::from_json_file("arenaloop.json")?;
//! let (roster, joins) = SharedRoster::new();
//! let roster = Arc::new(roster);
//!
//! let orchestrator = Orchestrator::builder(config)
//!     .notifier(Arc::new(ChannelNotifier::new()))
//!     .bridge(Arc::new(MyBridge))
//!     .roster(roster, joins)
//!     .build()?;
//! orchestrator.run().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod notifier;
mod orchestrator;
mod roster;

pub use config::OrchestratorConfig;
pub use error::ArenaloopError;
pub use notifier::ChannelNotifier;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use roster::SharedRoster;

pub use arenaloop_arena as arena;
pub use arenaloop_director as director;
pub use arenaloop_protocol as protocol;

pub use arenaloop_director::{EventModule, LobbyBridge, Notifier, Roster};

/// Everything a host or an event module author usually needs.
pub mod prelude {
    pub use crate::{
        ArenaloopError, ChannelNotifier, Orchestrator, OrchestratorConfig, SharedRoster,
    };
    pub use arenaloop_arena::{ArenaTemplate, Region};
    pub use arenaloop_director::{
        DirectorConfig, EventInfo, EventModule, LobbyBridge, ModuleContext, ModuleError,
        ModuleSource, Notifier, Phase, PlayerState, Roster,
    };
    pub use arenaloop_protocol::{ArenaId, Notice, PlayerId, Recipient, Vec3};
}
