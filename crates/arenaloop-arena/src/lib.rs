//! Arena lifecycle management for Arenaloop.
//!
//! An arena is the live world instance that hosts one event cycle. Arenas
//! are instantiated from named templates, and at most one is live at a
//! time. Whenever the live arena changes, the spatial-bounds cache is
//! invalidated so containment queries never see a destroyed arena.
//!
//! # Key types
//!
//! - [`ArenaManager`]: loads and unloads arenas, owns the live instance
//! - [`ArenaTemplate`] / [`ArenaCatalog`]: the named blueprints
//! - [`BoundsCache`]: the two-method containment contract
//! - [`RegionCache`]: default cache computing the live arena's region

mod bounds;
mod config;
mod error;
mod manager;

pub use bounds::{BoundsCache, RegionCache};
pub use config::{ArenaCatalog, ArenaTemplate, Region};
pub use error::ArenaError;
pub use manager::{ArenaManager, ArenaSlot, LiveArena};
