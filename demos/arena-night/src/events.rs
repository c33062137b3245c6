//! The two events arena-night ships with.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use arenaloop::prelude::*;
use async_trait::async_trait;

pub const LAVA_ARENA: &str = "Volcano";

/// Longest a lava round may last before it is called a draw.
const LAVA_MAX_SECS: u32 = 60;

pub fn sources() -> Vec<ModuleSource> {
    vec![
        ModuleSource::from_fn("floor-is-lava", FloorIsLava::new),
        ModuleSource::from_fn("simon-says", |_ctx| SimonSays::default()),
    ]
}

// ---------------------------------------------------------------------------
// Floor is lava
// ---------------------------------------------------------------------------

/// Players stand in the volcano until the floor has burned everyone.
pub struct FloorIsLava {
    ctx: ModuleContext,
    rounds_played: AtomicU32,
}

impl FloorIsLava {
    pub fn new(ctx: ModuleContext) -> Self {
        Self {
            ctx,
            rounds_played: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl EventModule for FloorIsLava {
    fn info(&self) -> EventInfo {
        EventInfo::new("Floor Is Lava", 10)
    }

    fn map_name(&self) -> Option<String> {
        Some(LAVA_ARENA.to_string())
    }

    async fn start(&self) -> Result<(), ModuleError> {
        let round = self.rounds_played.fetch_add(1, Ordering::Relaxed) + 1;
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await;

        for elapsed in 1..=LAVA_MAX_SECS {
            ticker.tick().await;
            if !self.ctx.any_player_alive_in_arena() {
                tracing::info!(round, elapsed_secs = elapsed, "everyone burned");
                return Ok(());
            }
        }
        tracing::info!(round, "lava cooled with survivors standing");
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), ModuleError> {
        // The director unloads the volcano; nothing of ours is left in it.
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simon says
// ---------------------------------------------------------------------------

/// A lobby-side event with no arena of its own.
#[derive(Default)]
pub struct SimonSays {
    commands: AtomicU32,
}

#[async_trait]
impl EventModule for SimonSays {
    fn info(&self) -> EventInfo {
        EventInfo::new("Simon Says", 5)
    }

    async fn start(&self) -> Result<(), ModuleError> {
        for _ in 0..5 {
            let n = self.commands.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::info!(command = n, "simon says jump");
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), ModuleError> {
        self.commands.store(0, Ordering::Relaxed);
        Ok(())
    }
}
