/// Errors from the `cmdtree` binary.
use std::io;

use cmdtree::DefinitionError;
use thiserror::Error;

/// Errors that end a `cmdtree` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The definition file could not be loaded or built.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// No command exists at the requested path.
    #[error("Command \"{path}\" not found")]
    CommandNotFound {
        /// The path as given.
        path: String,
        /// Close subcommand names, best first.
        candidates: Vec<String>,
    },

    /// The declared program rejected its argv; the message is already written.
    #[error("Invocation rejected")]
    Rejected,

    /// The declared command's action failed; the message is already written.
    #[error("{0}")]
    ActionFailed(String),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Definition(DefinitionError::Io { .. }) => "definition_unreadable",
            Self::Definition(_) => "invalid_definition",
            Self::CommandNotFound { .. } => "command_not_found",
            Self::Rejected => "invocation_rejected",
            Self::ActionFailed(_) => "action_failed",
            Self::Io(_) => "io_error",
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Definition(err) => err.exit_code(),
            Self::CommandNotFound { .. } => 4,
            Self::Rejected | Self::ActionFailed(_) | Self::Io(_) => 1,
        }
    }

    /// Whether the declared program already wrote a message for this error.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Rejected | Self::ActionFailed(_))
    }
}
