//! CLI-specific error types and exit code mapping

use airlock_core::error::AirlockError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Dependency resolution or mirror population failed.
    #[error("prefetch error: {0}")]
    Prefetch(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from airlock-core.
    #[error("{0}")]
    Core(#[from] AirlockError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                       |
    /// |------|-------------------------------|
    /// | 0    | Success                       |
    /// | 1    | General / command error       |
    /// | 2    | Configuration error           |
    /// | 4    | Prefetch failed               |
    /// | 10   | IO error                      |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Prefetch(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<airlock_yarn_classic::YarnClassicError> for CliError {
    fn from(e: airlock_yarn_classic::YarnClassicError) -> Self {
        match e {
            airlock_yarn_classic::YarnClassicError::Config { .. } => Self::Config(e.to_string()),
            _ => Self::Prefetch(e.to_string()),
        }
    }
}
