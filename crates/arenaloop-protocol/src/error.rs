//! Error types for the protocol layer.
//!
//! Each Arenaloop crate defines its own error enum. A `ProtocolError`
//! always means the problem is in turning notices into bytes or back,
//! never in the director's cycle or in arena bookkeeping.

/// Errors that can occur while encoding, decoding or checking notices.
///
/// The `#[error("...")]` attributes give the message each variant prints
/// in logs. The notifier logs these and drops the notice; nothing in the
/// director ever waits on a notice being delivered.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    ///
    /// The inner `serde_json::Error` is kept as-is so callers handle
    /// `ProtocolError` uniformly whichever codec produced it.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, missing
    /// fields or a truncated frame from the client.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message is well formed but violates a protocol rule.
    ///
    /// Raised by [`Notice::validate`](crate::Notice::validate) for an
    /// event warning with a blank name or a zero-second countdown. Such
    /// a notice would show players a countdown they cannot act on.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
