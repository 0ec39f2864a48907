/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout, either as JSON or rendered
/// as a table. They are decoupled from the library's borrowed tree views.
use cmdtree::{CommandRef, ErrorKind, OptionValue, ParsedPayload, Tokens};
use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::CliError;

/// A command in flat (list) representation.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    /// Qualified name (e.g., "banana:plantain"); empty for the root.
    pub path: String,
    /// Usage line (e.g., "fruit banana:plantain <flavour>").
    pub usage: String,
    /// Number of declared positional arguments.
    pub arguments: usize,
    /// Number of effective options, inherited ones included.
    pub options: usize,
    /// Number of direct subcommands.
    pub subcommands: usize,
    /// Whether the command runs an action.
    pub action: bool,
    /// Description, or null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Depth from root (0 = root).
    pub depth: usize,
}

impl CommandOutput {
    #[must_use]
    pub fn from_command(command: CommandRef<'_>) -> Self {
        let path = command.qualified_name();
        let usage = std::iter::once(command.program_name().to_owned())
            .chain((!path.is_empty()).then(|| path.clone()))
            .chain(command.arguments().iter().map(cmdtree::ArgumentSpec::usage))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            usage,
            arguments: command.arguments().len(),
            options: command.effective_options().len(),
            subcommands: command.children().count(),
            action: command.action().is_some(),
            help: command.help().map(str::to_owned),
            depth: command.depth(),
            path,
        }
    }
}

/// A command in tree representation (nested).
#[derive(Debug, Clone, Serialize)]
pub struct CommandTreeOutput {
    /// Own name (the program name for the root).
    pub name: String,
    /// Qualified name; empty for the root.
    pub path: String,
    /// Description, or null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Nested subcommands.
    pub children: Vec<CommandTreeOutput>,
}

impl CommandTreeOutput {
    #[must_use]
    pub fn from_command(command: CommandRef<'_>) -> Self {
        Self {
            name: command.name().to_owned(),
            path: command.qualified_name(),
            help: command.help().map(str::to_owned),
            children: command.children().map(Self::from_command).collect(),
        }
    }
}

/// One parse error.
#[derive(Debug, Clone, Serialize)]
pub struct ParseErrorOutput {
    /// `command`, `argument`, or `option`.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Rendered message.
    pub error: String,
}

/// Result of parsing one argv.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    /// Qualified name of the resolved command; empty for the root.
    pub command: String,
    /// Argument name to value (null when absent).
    pub args: IndexMap<String, Option<String>>,
    /// Option name to value (bool for flags, string or null for values).
    pub options: IndexMap<String, OptionValue>,
    /// Validation errors, in order.
    pub errors: Vec<ParseErrorOutput>,
    /// Tokenizer output.
    pub raw: Tokens,
}

impl From<&ParsedPayload<'_>> for ParseOutput {
    fn from(payload: &ParsedPayload<'_>) -> Self {
        Self {
            command: payload.command.qualified_name(),
            args: payload.args.clone(),
            options: payload.options.clone(),
            errors: payload
                .errors
                .iter()
                .map(|d| ParseErrorOutput {
                    kind: d.kind(),
                    error: d.message.clone(),
                })
                .collect(),
            raw: payload.raw.clone(),
        }
    }
}

/// Top-level error envelope for JSON error output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional list of candidates (for unresolved command paths).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

impl ErrorOutput {
    /// Construct from a `CliError`.
    #[must_use]
    pub fn from_cli_error(err: &CliError) -> Self {
        let candidates = match err {
            CliError::CommandNotFound { candidates, .. } if !candidates.is_empty() => {
                Some(candidates.clone())
            }
            _ => None,
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                candidates,
            },
        }
    }
}
