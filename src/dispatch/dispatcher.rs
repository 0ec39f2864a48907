/// Decides what a parsed invocation does and writes the resulting message.
///
/// Precedence, first match wins:
///
/// 1. An unresolved command path writes only the command error.
/// 2. The first truthy option (in effective order) with an action runs it,
///    masking any argument or option errors.
/// 3. Any remaining error writes the error message.
/// 4. The command's action runs.
/// 5. Without an action, the command's help is written.
use std::{
    cell::RefCell,
    io::{self, Write},
};

use futures::executor::block_on;
use tracing::debug;

use super::action::{Action, ActionOutcome, Completer, Invocation};
use crate::{
    parse::{Diagnostic, ErrorKind, ParsedPayload, Parser},
    render::{DefaultFormatter, MessageFormatter},
    tree::{CommandTree, OptionAction},
};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command's action ran and succeeded.
    Completed,
    /// The command has no action; its help was written.
    Help,
    /// An option action ran and succeeded.
    OptionAction,
    /// Parse errors were written instead of running anything.
    Rejected,
    /// An action reported this failure.
    Failed(String),
}

impl Outcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed(_) => 1,
            Self::Completed | Self::Help | Self::OptionAction | Self::Rejected => 0,
        }
    }
}

/// Runs parsed invocations against a tree.
pub struct Dispatcher {
    parser: Parser,
    formatter: Box<dyn MessageFormatter>,
    output: RefCell<Box<dyn Write>>,
}

impl Dispatcher {
    /// Dispatcher writing default-formatted messages to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            formatter: Box::new(DefaultFormatter),
            output: RefCell::new(Box::new(io::stdout())),
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Send messages to `output` instead of stdout.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = RefCell::new(Box::new(output));
        self
    }

    #[must_use]
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    #[must_use]
    pub fn formatter(&self) -> &dyn MessageFormatter {
        self.formatter.as_ref()
    }

    /// Parse `argv` against `tree` and dispatch it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing a message to the output fails.
    pub fn run<I, S>(&self, tree: &CommandTree, argv: I) -> io::Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let payload = self.parser.parse(tree, argv);
        self.dispatch(&payload)
    }

    /// Dispatch an already-parsed invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if writing a message to the output fails.
    pub fn dispatch(&self, payload: &ParsedPayload<'_>) -> io::Result<Outcome> {
        let command = payload.command;

        if payload.has_command_error() {
            debug!(command = %command.qualified_name(), "command path unresolved");
            let unresolved: Vec<Diagnostic> = payload
                .errors
                .iter()
                .filter(|d| d.kind() == ErrorKind::Command)
                .cloned()
                .collect();
            self.write(&self.formatter.error(command, &unresolved))?;
            return Ok(Outcome::Rejected);
        }

        if let Some((name, action)) = triggered_option(payload) {
            debug!(option = name, "running option action");
            return match action {
                OptionAction::ShowHelp => {
                    self.write(&self.formatter.help(command))?;
                    Ok(Outcome::OptionAction)
                }
                OptionAction::ShowVersion => {
                    self.write(&self.formatter.version(command))?;
                    Ok(Outcome::OptionAction)
                }
                OptionAction::Custom(action) => self.invoke(payload, action, Outcome::OptionAction),
            };
        }

        if !payload.is_ok() {
            debug!(errors = payload.errors.len(), "rejecting invalid invocation");
            self.write(&self.formatter.error(command, &payload.errors))?;
            return Ok(Outcome::Rejected);
        }

        match command.action() {
            Some(action) => {
                debug!(command = %command.qualified_name(), "running command action");
                self.invoke(payload, action, Outcome::Completed)
            }
            None => {
                self.write(&self.formatter.help(command))?;
                Ok(Outcome::Help)
            }
        }
    }

    fn invoke(
        &self,
        payload: &ParsedPayload<'_>,
        action: &Action,
        success: Outcome,
    ) -> io::Result<Outcome> {
        let invocation = Invocation::new(payload, &self.output);
        let (completer, receiver) = Completer::channel();

        let result = match action.call(&invocation, completer) {
            ActionOutcome::Done(result) => result,
            ActionOutcome::Deferred(future) => block_on(future),
            ActionOutcome::Pending => block_on(receiver).unwrap_or_else(|_| {
                debug!("completer dropped without a result");
                Ok(())
            }),
        };

        match result {
            Err(error) if !error.is_empty() => {
                debug!(%error, "action failed");
                self.write(&self.formatter.failure(payload.command, &error))?;
                Ok(Outcome::Failed(error.to_string()))
            }
            _ => Ok(success),
        }
    }

    fn write(&self, message: &str) -> io::Result<()> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "{message}")?;
        output.flush()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn triggered_option<'t>(payload: &ParsedPayload<'t>) -> Option<(&'t str, &'t OptionAction)> {
    payload
        .command
        .effective_options()
        .into_iter()
        .find_map(|(name, spec)| {
            let action = spec.action.as_ref()?;
            payload
                .option(name)
                .is_some_and(|value| value.is_truthy())
                .then_some((name, action))
        })
}
