//! Core types shared by the orchestrator and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// Newtype over `u64` so a `PlayerId` can never be passed where an
/// [`ArenaId`] is expected. `#[serde(transparent)]` keeps the JSON form a
/// plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifies one live arena instance.
///
/// Every load of a template produces a fresh id, so two consecutive loads
/// of the same template are distinguishable in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaId(pub u64);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point (or extent) in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Recipient: who should receive a notice?
// ---------------------------------------------------------------------------

/// Specifies who should receive a notice.
///
/// The director broadcasts most notices; the late-join listener addresses
/// a single player who connected in the middle of a rest countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connected player.
    All,
    /// One specific player.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// Notice: player-facing messages
// ---------------------------------------------------------------------------

/// A fire-and-forget message pushed to players.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{ "type": "EventWarning", "name": "Lava Rising", "duration_secs": 10 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notice {
    /// Show or hide the rest countdown. `remaining_secs` is ignored by
    /// clients when `show` is false.
    RestNotice { show: bool, remaining_secs: u64 },

    /// An event has been chosen and starts in `duration_secs` seconds.
    EventWarning { name: String, duration_secs: u64 },
}

impl Notice {
    /// Checks the protocol rules that serde can't express.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for an event warning with
    /// an empty name or a zero duration.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            Self::RestNotice { .. } => Ok(()),
            Self::EventWarning { name, .. } if name.trim().is_empty() => Err(
                ProtocolError::InvalidMessage("event warning without a name".into()),
            ),
            Self::EventWarning { duration_secs: 0, name } => Err(ProtocolError::InvalidMessage(
                format!("event warning for {name} has zero duration"),
            )),
            Self::EventWarning { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_ids_display_with_prefix() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(ArenaId(3).to_string(), "A-3");
    }

    #[test]
    fn test_vec3_min_max_are_component_wise() {
        let a = Vec3::new(1.0, 5.0, -2.0);
        let b = Vec3::new(3.0, 0.0, -4.0);
        assert_eq!(a.min(b), Vec3::new(1.0, 0.0, -4.0));
        assert_eq!(a.max(b), Vec3::new(3.0, 5.0, -2.0));
    }

    #[test]
    fn test_event_warning_json_shape() {
        let notice = Notice::EventWarning {
            name: "Lava Rising".into(),
            duration_secs: 10,
        };
        let json: serde_json::Value = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "EventWarning");
        assert_eq!(json["name"], "Lava Rising");
        assert_eq!(json["duration_secs"], 10);
    }

    #[test]
    fn test_validate_rejects_zero_duration_warning() {
        let notice = Notice::EventWarning {
            name: "Floor Is Lava".into(),
            duration_secs: 0,
        };
        assert!(matches!(
            notice.validate(),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let notice = Notice::EventWarning {
            name: "  ".into(),
            duration_secs: 5,
        };
        assert!(notice.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_rest_notice() {
        let notice = Notice::RestNotice {
            show: true,
            remaining_secs: 0,
        };
        assert!(notice.validate().is_ok());
    }
}
