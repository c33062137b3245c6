//! Error types for the arena layer.

/// Errors that can occur during arena operations.
///
/// Neither variant is fatal to the orchestrator: a failed load leaves no
/// arena live and the cycle carries on without one.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// No template with this name exists in the catalog.
    #[error("arena template {0:?} not found")]
    TemplateNotFound(String),

    /// A template was rejected while building the catalog.
    #[error("invalid arena template: {0}")]
    InvalidTemplate(String),
}
