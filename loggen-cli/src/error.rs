//! CLI-specific error types and exit code mapping

use loggen_core::error::LoggenError;
use loggen_sequence::SequenceError;
use loggen_template::TemplateError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Template substitution failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Sequence pattern could not be used.
    #[error("sequence error: {0}")]
    Sequence(#[from] SequenceError),

    /// `check --strict` found open gaps.
    #[error("{missing} sequence number(s) missing in {gaps} gap(s)")]
    GapsFound {
        /// Number of open gaps
        gaps: usize,
        /// Total missing numbers
        missing: u64,
    },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from loggen-core.
    #[error("{0}")]
    Core(#[from] LoggenError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration or pattern error  |
    /// | 3    | Malformed template              |
    /// | 4    | Sequence gaps found (`--strict`) |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_)
            | Self::Sequence(_)
            | Self::Core(LoggenError::Config(_))
            | Self::Core(LoggenError::Sequence(_)) => 2,
            Self::Template(_) | Self::Core(LoggenError::Template(_)) => 3,
            Self::GapsFound { .. } => 4,
            Self::Io(_) | Self::Core(LoggenError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}
