//! A [`Notifier`] that encodes notices into per-player channels.
//!
//! Each connected player gets an outbox: an unbounded channel of encoded
//! [`Notice`] bytes. Whatever actually talks to the player (a websocket
//! task, a game client bridge, a test) drains the receiving end.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use arenaloop_director::Notifier;
use arenaloop_protocol::{Codec, JsonCodec, Notice, PlayerId, Recipient};
use tokio::sync::mpsc;

/// Fans notices out to registered player outboxes.
///
/// Sends never block and never fail loudly: a player whose receiver is
/// gone simply misses the notice.
pub struct ChannelNotifier<C: Codec = JsonCodec> {
    codec: C,
    outboxes: RwLock<HashMap<PlayerId, mpsc::UnboundedSender<Vec<u8>>>>,
}

impl ChannelNotifier<JsonCodec> {
    /// A notifier that encodes notices as JSON.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl Default for ChannelNotifier<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> ChannelNotifier<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            outboxes: RwLock::new(HashMap::new()),
        }
    }

    /// Opens an outbox for `player` and returns its receiving end.
    ///
    /// Registering the same player again replaces the previous outbox.
    pub fn register(&self, player: PlayerId) -> mpsc::UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player, tx);
        rx
    }

    /// Closes `player`'s outbox. Returns `false` if they had none.
    pub fn unregister(&self, player: PlayerId) -> bool {
        self.outboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player)
            .is_some()
    }

    pub fn outbox_count(&self) -> usize {
        self.outboxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Encodes `notice` once and pushes it to every matching outbox.
    pub fn deliver(&self, to: Recipient, notice: &Notice) {
        if let Err(e) = notice.validate() {
            tracing::warn!(error = %e, "refusing to send malformed notice");
            return;
        }
        let bytes = match self.codec.encode(notice) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode notice, dropping it");
                return;
            }
        };

        let outboxes = self.outboxes.read().unwrap_or_else(PoisonError::into_inner);
        match to {
            Recipient::All => {
                for (player, tx) in outboxes.iter() {
                    if tx.send(bytes.clone()).is_err() {
                        tracing::debug!(%player, "outbox closed, notice dropped");
                    }
                }
            }
            Recipient::Player(player) => match outboxes.get(&player) {
                Some(tx) => {
                    if tx.send(bytes).is_err() {
                        tracing::debug!(%player, "outbox closed, notice dropped");
                    }
                }
                None => tracing::debug!(%player, "no outbox for player, notice dropped"),
            },
        }
    }
}

impl<C: Codec> Notifier for ChannelNotifier<C> {
    fn broadcast_warning(&self, event_name: &str, duration_secs: u64) {
        self.deliver(
            Recipient::All,
            &Notice::EventWarning {
                name: event_name.to_string(),
                duration_secs,
            },
        );
    }

    fn show_rest_notice(&self, to: Recipient, show: bool, remaining_secs: u64) {
        self.deliver(
            to,
            &Notice::RestNotice {
                show,
                remaining_secs,
            },
        );
    }
}
