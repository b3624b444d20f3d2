//! Setup errors for wander agents

use thiserror::Error;

/// Errors raised while configuring or constructing a controller.
///
/// Ticking a fully built controller cannot fail.
#[derive(Debug, Error)]
pub enum WanderError {
    /// A required collaborator was not provided to the builder.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A configuration value is out of range.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// The configuration file is not valid RON.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
