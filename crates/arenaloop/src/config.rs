//! Startup configuration loaded from a JSON file.
//!
//! ```json
//! {
//!   "director": { "rest_min_secs": 20, "rest_max_secs": 40, "min_players": 2 },
//!   "arenas": [
//!     { "name": "Volcano", "parts": [ { "min": { "x": -50, "y": 0, "z": -50 },
//!                                       "max": { "x": 50, "y": 30, "z": 50 } } ] }
//!   ]
//! }
//! ```
//!
//! Both sections are optional.

use std::path::Path;

use arenaloop_arena::{ArenaCatalog, ArenaTemplate};
use arenaloop_director::DirectorConfig;
use serde::{Deserialize, Serialize};

use crate::ArenaloopError;

/// Everything the orchestrator reads once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub director: DirectorConfig,

    /// Arena templates event modules may name.
    pub arenas: Vec<ArenaTemplate>,
}

impl OrchestratorConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    /// Returns [`ArenaloopError::ConfigParse`] for malformed JSON or
    /// fields of the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, ArenaloopError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    /// Returns [`ArenaloopError::ConfigIo`] if the file can't be read, or
    /// [`ArenaloopError::ConfigParse`] if its content is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ArenaloopError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ArenaloopError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            arenas = config.arenas.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Builds the arena catalog from the configured templates.
    ///
    /// # Errors
    /// Returns [`ArenaloopError::Arena`] for a template with a blank name.
    pub fn catalog(&self) -> Result<ArenaCatalog, ArenaloopError> {
        Ok(ArenaCatalog::from_templates(self.arenas.iter().cloned())?)
    }
}
