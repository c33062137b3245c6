//! Late-join handling: players who connect during a rest countdown.
//!
//! Broadcast rest notices only reach players who were connected when the
//! countdown started. The [`JoinListener`] runs beside the director and,
//! for every newly joined player, waits until they are ready and then
//! sends them the time left, computed from the rest window the director
//! last published.

use std::sync::Arc;

use arenaloop_protocol::{PlayerId, Recipient};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::debug;

use crate::phase::display_secs;
use crate::{Notifier, PhaseSnapshot, Roster};

/// Sends late joiners the remaining rest time.
///
/// Only reads the director's phase; never changes it.
#[derive(Clone)]
pub struct JoinListener {
    phase: watch::Receiver<PhaseSnapshot>,
    roster: Arc<dyn Roster>,
    notifier: Arc<dyn Notifier>,
}

impl JoinListener {
    /// `phase` comes from [`Director::subscribe`](crate::Director::subscribe).
    pub fn new(
        phase: watch::Receiver<PhaseSnapshot>,
        roster: Arc<dyn Roster>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            phase,
            roster,
            notifier,
        }
    }

    /// Handles joins until the sending side of `joins` is dropped.
    ///
    /// Each join gets its own task, so a player whose presence is slow to
    /// become ready does not hold up anyone else.
    pub async fn run(self, mut joins: mpsc::UnboundedReceiver<PlayerId>) {
        while let Some(player) = joins.recv().await {
            let listener = self.clone();
            tokio::spawn(async move {
                listener.greet(player).await;
            });
        }
        debug!("join channel closed, late-join listener stopping");
    }

    /// Waits for `player` to be ready, then sends them the rest notice if
    /// a countdown is running at that moment.
    ///
    /// Returns the seconds announced, or `None` if nothing was sent.
    pub async fn greet(&self, player: PlayerId) -> Option<u64> {
        if !self.roster.wait_until_ready(player).await {
            debug!(%player, "player left before becoming ready");
            return None;
        }

        let snapshot = *self.phase.borrow();
        let remaining = snapshot.remaining_rest(Instant::now())?;
        let secs = display_secs(remaining);
        if secs == 0 {
            return None;
        }

        self.notifier
            .show_rest_notice(Recipient::Player(player), true, secs);
        debug!(%player, remaining_secs = secs, "sent rest countdown to late joiner");
        Some(secs)
    }
}
