//! Shared vocabulary for Arenaloop.
//!
//! Every other crate in the workspace speaks in these types:
//!
//! - **Identity** ([`PlayerId`], [`ArenaId`]): who and which arena instance.
//! - **Geometry** ([`Vec3`]): positions used for arena containment tests.
//! - **Notices** ([`Notice`], [`Recipient`]): the fire-and-forget messages
//!   the orchestrator pushes to players (rest countdowns, event warnings).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how notices become bytes
//!   for whatever delivers them.
//!
//! ```text
//! Director (phases) → Notice → Codec (bytes) → player outbox
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ArenaId, Notice, PlayerId, Recipient, Vec3};
