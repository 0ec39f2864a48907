/// Command and option callbacks, and the contract for reporting completion.
use std::{
    cell::RefCell,
    fmt,
    future::Future,
    io::{self, Write},
    sync::Arc,
};

use futures::{
    channel::oneshot,
    future::{FutureExt, LocalBoxFuture},
};
use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    parse::{OptionValue, ParsedPayload, Tokens},
    tree::CommandRef,
};

/// Result reported by an action.
pub type ActionResult = Result<(), ActionError>;

/// Failure reported by an action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Plain message, shown after `Error:`.
    #[error("{0}")]
    Message(String),

    /// Any other error, propagated with `?`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActionError {
    /// Failure with a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// An empty message carries no failure and counts as success.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Message(message) if message.is_empty())
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

/// What an action hands back to the dispatcher.
pub enum ActionOutcome {
    /// Finished synchronously.
    Done(ActionResult),
    /// Finishes when the future resolves.
    Deferred(LocalBoxFuture<'static, ActionResult>),
    /// Finishes when the [`Completer`] passed to the action is used or dropped.
    Pending,
}

impl ActionOutcome {
    /// Synchronous success.
    #[must_use]
    pub fn ok() -> Self {
        Self::Done(Ok(()))
    }

    /// Synchronous failure with a message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Done(Err(ActionError::msg(message)))
    }

    /// Wrap a future.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = ActionResult> + 'static,
    {
        Self::Deferred(future.boxed_local())
    }
}

impl From<ActionResult> for ActionOutcome {
    fn from(result: ActionResult) -> Self {
        Self::Done(result)
    }
}

impl From<()> for ActionOutcome {
    fn from((): ()) -> Self {
        Self::ok()
    }
}

impl fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(result) => f.debug_tuple("Done").field(result).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::Pending => f.write_str("Pending"),
        }
    }
}

/// One-shot handle for reporting completion out of band.
///
/// Consumed by [`complete`](Self::complete), so an action can report at most
/// once. Dropping it unused reports success.
#[derive(Debug)]
pub struct Completer {
    sender: oneshot::Sender<ActionResult>,
}

impl Completer {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<ActionResult>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Report the action's result.
    pub fn complete(self, result: ActionResult) {
        // The receiver is gone once the action chose another outcome.
        let _ = self.sender.send(result);
    }

    /// Report success.
    pub fn succeed(self) {
        self.complete(Ok(()));
    }

    /// Report failure with a message.
    pub fn fail(self, message: impl Into<String>) {
        self.complete(Err(ActionError::msg(message)));
    }
}

/// What an action sees of the parsed invocation.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    payload: &'a ParsedPayload<'a>,
    output: &'a RefCell<Box<dyn Write>>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(payload: &'a ParsedPayload<'a>, output: &'a RefCell<Box<dyn Write>>) -> Self {
        Self { payload, output }
    }

    /// Write one line to the dispatcher's output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written or flushed.
    pub fn println(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "{text}")?;
        output.flush()
    }

    /// The resolved command.
    #[must_use]
    pub fn command(&self) -> CommandRef<'a> {
        self.payload.command
    }

    /// Declared argument values.
    #[must_use]
    pub fn args(&self) -> &'a IndexMap<String, Option<String>> {
        &self.payload.args
    }

    /// Value of one argument.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&'a str> {
        self.payload.arg(name)
    }

    /// Parsed option values.
    #[must_use]
    pub fn options(&self) -> &'a IndexMap<String, OptionValue> {
        &self.payload.options
    }

    /// Value of one option.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&'a OptionValue> {
        self.payload.option(name)
    }

    /// Whether a flag was set.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.payload.flag(name)
    }

    /// Tokenizer output.
    #[must_use]
    pub fn raw(&self) -> &'a Tokens {
        &self.payload.raw
    }

    /// The whole parse result.
    #[must_use]
    pub fn payload(&self) -> &'a ParsedPayload<'a> {
        self.payload
    }
}

type ActionFn = dyn Fn(&Invocation<'_>, Completer) -> ActionOutcome + Send + Sync;

/// A shareable callback attached to a command or an option.
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    /// Wrap a closure.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&Invocation<'_>, Completer) -> ActionOutcome + Send + Sync + 'static,
    {
        Self(Arc::new(action))
    }

    /// Call the action.
    pub fn call(&self, invocation: &Invocation<'_>, completer: Completer) -> ActionOutcome {
        (self.0)(invocation, completer)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}


impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("payload", self.payload)
            .finish_non_exhaustive()
    }
}
