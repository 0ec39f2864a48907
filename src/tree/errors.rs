/// Errors raised while declaring or querying a command tree.
use thiserror::Error;

/// Declaration-time errors for command trees.
///
/// Parsing never produces these; they surface while the tree is being built
/// (or looked up by path), before any user input is involved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A required argument was declared after an optional one.
    #[error(
        "Argument <{name}> of command '{command}' is required but follows optional argument <{after}>"
    )]
    RequiredAfterOptional {
        /// Qualified name of the command (empty for the root).
        command: String,
        /// The offending required argument.
        name: String,
        /// The optional argument it follows.
        after: String,
    },

    /// Two arguments on the same command share a name.
    #[error("Argument <{name}> is declared twice on command '{command}'")]
    DuplicateArgument {
        /// Qualified name of the command (empty for the root).
        command: String,
        /// The duplicated argument name.
        name: String,
    },

    /// No command exists at the given path.
    #[error("No command at path '{path}'")]
    UnknownCommand {
        /// The colon-delimited path that was looked up.
        path: String,
    },
}
