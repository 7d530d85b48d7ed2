//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can stop the engine during
//! startup. Once the tick loop runs, failures are logged and retried
//! rather than propagated.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: scorebug_core::config::ConfigError,
    },

    /// The templates could not be compiled.
    #[error("publisher error: {source}")]
    Publish {
        /// The underlying publish error.
        #[from]
        source: scorebug_publish::PublishError,
    },

    /// The observer server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: scorebug_observer::StartupError,
    },
}
