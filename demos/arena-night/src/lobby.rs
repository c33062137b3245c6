//! Simulated players and the lobby they wait in.

use std::sync::Arc;
use std::time::Duration;

use arenaloop::prelude::*;
use async_trait::async_trait;
use rand::Rng;
use tokio::sync::mpsc;

/// Where players stand between events, well outside any arena.
const LOBBY: Vec3 = Vec3::new(500.0, 0.0, 500.0);

/// Time it takes the lobby to bring everyone back after an event.
const RETURN_TIME: Duration = Duration::from_secs(2);

/// Health lost per second by a player standing in an arena.
const BURN_PER_SEC: std::ops::RangeInclusive<f32> = 5.0..=35.0;

// ---------------------------------------------------------------------------
// SimBridge
// ---------------------------------------------------------------------------

/// Teleports every rostered player between the lobby and the arena origin.
pub struct SimBridge {
    roster: Arc<SharedRoster>,
}

impl SimBridge {
    pub fn new(roster: Arc<SharedRoster>) -> Self {
        Self { roster }
    }

    fn move_all(&self, to: Vec3) {
        for player in self.roster.players() {
            self.roster.update(player.id, to, 100.0);
        }
    }
}

#[async_trait]
impl LobbyBridge for SimBridge {
    async fn start_event(&self, arena: Option<&str>) {
        match arena {
            Some(name) => {
                tracing::info!(
                    arena = name,
                    players = self.roster.player_count(),
                    "moving players into arena"
                );
                self.move_all(Vec3::ZERO);
            }
            None => tracing::info!("event runs in the lobby"),
        }
    }

    async fn end_event(&self) {
        tokio::time::sleep(RETURN_TIME).await;
        self.move_all(LOBBY);
        tracing::info!("players back in the lobby");
    }
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

/// Drives simulated players: they trickle in, print what they're told,
/// and burn while standing in an arena.
#[derive(Clone)]
pub struct Bots {
    roster: Arc<SharedRoster>,
    notifier: Arc<ChannelNotifier>,
}

impl Bots {
    pub fn new(roster: Arc<SharedRoster>, notifier: Arc<ChannelNotifier>) -> Self {
        Self { roster, notifier }
    }

    /// Connects `count` bots a few seconds apart.
    pub async fn arrive(self, count: u64) {
        for n in 1..=count {
            let player = PlayerId(n);
            let outbox = self.notifier.register(player);
            tokio::spawn(read_notices(player, outbox));

            self.roster.join(player, LOBBY);
            let delay = rand::rng().random_range(200..=1_500);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.roster.mark_ready(player);

            tokio::time::sleep(Duration::from_secs(3)).await;
        }
    }

    /// Once a second, burns everyone standing away from the lobby.
    pub async fn simulate(self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            ticker.tick().await;
            for player in self.roster.players() {
                if player.position == LOBBY || !player.is_alive() {
                    continue;
                }
                let burn = rand::rng().random_range(BURN_PER_SEC);
                let health = (player.health - burn).max(0.0);
                self.roster.update(player.id, player.position, health);
                if health == 0.0 {
                    tracing::debug!(player = %player.id, "bot burned");
                }
            }
        }
    }
}

async fn read_notices(player: PlayerId, mut outbox: mpsc::UnboundedReceiver<Vec<u8>>) {
    while let Some(bytes) = outbox.recv().await {
        tracing::info!(%player, notice = %String::from_utf8_lossy(&bytes), "bot received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bridge_moves_players_and_restores_health() {
        let (roster, _joins) = SharedRoster::new();
        let roster = Arc::new(roster);
        roster.join(PlayerId(1), LOBBY);
        let bridge = SimBridge::new(Arc::clone(&roster));

        bridge.start_event(Some("Volcano")).await;
        assert_eq!(roster.get(PlayerId(1)).unwrap().position, Vec3::ZERO);

        roster.update(PlayerId(1), Vec3::ZERO, 0.0);
        let started = tokio::time::Instant::now();
        bridge.end_event().await;

        let state = roster.get(PlayerId(1)).unwrap();
        assert_eq!(started.elapsed(), RETURN_TIME);
        assert_eq!(state.position, LOBBY);
        assert!(state.is_alive());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_without_arena_leaves_players() {
        let (roster, _joins) = SharedRoster::new();
        let roster = Arc::new(roster);
        roster.join(PlayerId(1), LOBBY);
        SimBridge::new(Arc::clone(&roster)).start_event(None).await;
        assert_eq!(roster.get(PlayerId(1)).unwrap().position, LOBBY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_burns_only_players_in_arena() {
        let (roster, _joins) = SharedRoster::new();
        let roster = Arc::new(roster);
        roster.join(PlayerId(1), LOBBY);
        roster.join(PlayerId(2), Vec3::ZERO);
        let bots = Bots::new(Arc::clone(&roster), Arc::new(ChannelNotifier::new()));
        tokio::spawn(bots.simulate());

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(roster.get(PlayerId(1)).unwrap().health, 100.0);
        assert!(roster.get(PlayerId(2)).unwrap().health < 100.0);
    }
}
