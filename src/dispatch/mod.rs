/// Running actions for parsed invocations.
pub mod action;
pub mod dispatcher;

pub use action::{Action, ActionError, ActionOutcome, ActionResult, Completer, Invocation};
pub use dispatcher::{Dispatcher, Outcome};
