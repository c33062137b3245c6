//! An in-memory [`Roster`] the host updates as players come and go.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use arenaloop_director::{PlayerState, Roster};
use arenaloop_protocol::{PlayerId, Vec3};
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

/// Health a freshly joined player starts with.
const STARTING_HEALTH: f32 = 100.0;

struct Entry {
    state: PlayerState,
    /// Flips to `true` once the player's presence can receive notices.
    ready: watch::Sender<bool>,
}

/// Connected players, shared between the host and the orchestrator.
///
/// Every [`join`](Self::join) is also pushed onto the join channel
/// returned by [`new`](Self::new), which feeds the late-join listener.
pub struct SharedRoster {
    players: RwLock<HashMap<PlayerId, Entry>>,
    joins: mpsc::UnboundedSender<PlayerId>,
}

impl SharedRoster {
    /// Creates an empty roster and the receiving end of its join channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlayerId>) {
        let (joins, rx) = mpsc::unbounded_channel();
        let roster = Self {
            players: RwLock::new(HashMap::new()),
            joins,
        };
        (roster, rx)
    }

    /// Adds a player at `position`. Returns `false` if they were already here.
    pub fn join(&self, player: PlayerId, position: Vec3) -> bool {
        {
            let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
            if players.contains_key(&player) {
                return false;
            }
            let (ready, _) = watch::channel(false);
            players.insert(
                player,
                Entry {
                    state: PlayerState {
                        id: player,
                        position,
                        health: STARTING_HEALTH,
                    },
                    ready,
                },
            );
        }
        tracing::debug!(%player, "player joined");
        if self.joins.send(player).is_err() {
            tracing::debug!(%player, "join channel closed, late-join notice skipped");
        }
        true
    }

    /// Removes a player. Anyone waiting for them to become ready gets `false`.
    pub fn leave(&self, player: PlayerId) -> bool {
        let removed = self
            .players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player)
            .is_some();
        if removed {
            tracing::debug!(%player, "player left");
        }
        removed
    }

    /// Records a player's latest position and health.
    pub fn update(&self, player: PlayerId, position: Vec3, health: f32) -> bool {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        match players.get_mut(&player) {
            Some(entry) => {
                entry.state.position = position;
                entry.state.health = health;
                true
            }
            None => false,
        }
    }

    /// Marks a player's presence as ready to receive notices.
    pub fn mark_ready(&self, player: PlayerId) -> bool {
        let players = self.players.read().unwrap_or_else(PoisonError::into_inner);
        match players.get(&player) {
            Some(entry) => {
                entry.ready.send_replace(true);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<PlayerState> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&player)
            .map(|entry| entry.state)
    }
}

#[async_trait]
impl Roster for SharedRoster {
    fn players(&self) -> Vec<PlayerState> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|entry| entry.state)
            .collect()
    }

    fn player_count(&self) -> usize {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn wait_until_ready(&self, player: PlayerId) -> bool {
        let mut ready = {
            let players = self.players.read().unwrap_or_else(PoisonError::into_inner);
            match players.get(&player) {
                Some(entry) => entry.ready.subscribe(),
                None => return false,
            }
        };
        // The sender lives in the entry, so `leave` closes the channel.
        ready.wait_for(|ready| *ready).await.is_ok()
    }
}
