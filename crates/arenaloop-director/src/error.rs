//! Error types for the director layer.

use std::any::Any;

use arenaloop_arena::ArenaError;

/// Errors raised by or about event modules.
///
/// The director never propagates these past a phase boundary: they are
/// logged with the module's name and the cycle moves on.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The module reported a failure from `start`, `cleanup`, or its loader.
    #[error("{0}")]
    Failed(String),

    /// The module panicked. The payload message is kept when it is a string.
    #[error("module panicked: {0}")]
    Panicked(String),

    /// The module's metadata breaks the registry rules (blank name,
    /// zero-second warning).
    #[error("invalid event info: {0}")]
    InvalidInfo(String),

    /// A module was enabled in configuration but no source provides it.
    #[error("no module source named {0:?}")]
    MissingSource(String),

    /// An arena operation requested by the module failed.
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

impl ModuleError {
    /// Shorthand for [`ModuleError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Builds a [`ModuleError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_panic_keeps_str_payload() {
        let err = ModuleError::from_panic(Box::new("lava everywhere"));
        assert_eq!(err.to_string(), "module panicked: lava everywhere");
    }

    #[test]
    fn test_from_panic_keeps_string_payload() {
        let err = ModuleError::from_panic(Box::new(String::from("index 7 out of range")));
        assert!(matches!(err, ModuleError::Panicked(ref m) if m == "index 7 out of range"));
    }

    #[test]
    fn test_from_panic_other_payload() {
        let err = ModuleError::from_panic(Box::new(42_u32));
        assert!(err.to_string().contains("non-string"));
    }

    #[test]
    fn test_from_arena_error() {
        let err: ModuleError = ArenaError::TemplateNotFound("Volcano".into()).into();
        assert!(matches!(err, ModuleError::Arena(_)));
        assert!(err.to_string().contains("Volcano"));
    }
}
