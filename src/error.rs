// ABOUTME: Defines all error types for the symposium library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under SymposiumError.

use crate::coordinator::{PhilosopherId, Request};

/// Top-level error type for the symposium library.
#[derive(Debug, thiserror::Error)]
pub enum SymposiumError {
    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dinner error: {0}")]
    Dinner(#[from] DinnerError),
}

/// Errors from the coordinator's blocking operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonitorError {
    /// A blocked wait was cancelled before it could be granted.
    #[error("philosopher {id} was interrupted while waiting for {request}")]
    Interrupted { id: PhilosopherId, request: Request },
}

/// Errors from loading or validating a dinner configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from running philosophers around the table.
#[derive(Debug, thiserror::Error)]
pub enum DinnerError {
    #[error("Interrupted: {0}")]
    Interrupted(#[from] MonitorError),

    #[error("philosopher {id} stopped before finishing: shutdown requested")]
    Stopped { id: PhilosopherId },

    #[error("philosopher {id} task failed: {message}")]
    Task { id: PhilosopherId, message: String },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
