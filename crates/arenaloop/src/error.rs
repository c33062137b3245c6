//! Unified error type for Arenaloop.

use std::path::PathBuf;

use arenaloop_arena::ArenaError;
use arenaloop_director::ModuleError;
use arenaloop_protocol::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// Only setup can fail: once [`Orchestrator::run`](crate::Orchestrator::run)
/// is called, module and arena errors are contained inside the cycle.
#[derive(Debug, thiserror::Error)]
pub enum ArenaloopError {
    /// A protocol-level error (encode, decode, invalid notice).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An arena-level error (unknown or invalid template).
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// An event module error.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`OrchestratorConfig`](crate::OrchestratorConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The builder was finished without a required collaborator.
    #[error("orchestrator is missing a {0}")]
    MissingCollaborator(&'static str),
}
