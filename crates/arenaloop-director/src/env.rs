//! What the director needs from its environment.
//!
//! The orchestrator owns no transport and no player bookkeeping. It
//! talks to the outside world through three narrow traits that a host
//! implements: deliver notices ([`Notifier`]), move players between the
//! lobby and the arena ([`LobbyBridge`]), and report who is connected
//! ([`Roster`]).

use arenaloop_protocol::{PlayerId, Recipient, Vec3};
use async_trait::async_trait;

/// Fire-and-forget delivery of player notices.
///
/// Implementations must not block; the director calls these from its
/// control loop. Delivery failures are the implementation's to log: the
/// director never learns whether a notice arrived and never retries.
/// Late joiners get a fresh rest notice addressed to
/// [`Recipient::Player`] rather than a replay of the broadcast.
pub trait Notifier: Send + Sync {
    /// Tell every connected player which event is coming and how long
    /// until it starts.
    fn broadcast_warning(&self, event_name: &str, duration_secs: u64);

    /// Show (with the seconds left) or hide the rest countdown.
    fn show_rest_notice(&self, to: Recipient, show: bool, remaining_secs: u64);
}

/// Moves players between the waiting lobby and the live arena.
///
/// The director calls the two halves in a fixed order around every
/// event:
///
/// ```text
///   load arena ─► settle ─► start_event ─► module.start
///                                              │
///   unload arena ◄── end_event ◄── module.cleanup
/// ```
///
/// Both calls are awaited inline on the director's task, so neither may
/// panic or hang. `end_event` is awaited to completion before the
/// arena is unloaded, so an implementation that teleports players over
/// several ticks must not return until the last one has left. Nobody may
/// be standing in an arena when it disappears.
#[async_trait]
pub trait LobbyBridge: Send + Sync {
    /// Move eligible players from the lobby into `arena`.
    ///
    /// `None` means the event has no arena (or its template was missing)
    /// and plays out in the lobby. Implementations may do nothing then.
    async fn start_event(&self, arena: Option<&str>);

    /// Move everyone back to the lobby. Resolves only once all players
    /// have arrived; the director unloads the arena right after.
    async fn end_event(&self);
}

/// A player as the roster sees them right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: Vec3,
    pub health: f32,
}

impl PlayerState {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// The live set of connected players. Owned by the environment; the
/// director only reads it. May be empty at any time.
#[async_trait]
pub trait Roster: Send + Sync {
    /// Everyone currently connected.
    fn players(&self) -> Vec<PlayerState>;

    fn player_count(&self) -> usize {
        self.players().len()
    }

    /// Resolves once `player`'s in-world presence is ready to receive
    /// notices. Returns `false` if they left before that happened.
    async fn wait_until_ready(&self, player: PlayerId) -> bool;
}
