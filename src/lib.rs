//! cmdtree: declarative command trees for command-line programs.
//!
//! A program is a tree of commands. Each command declares its positional
//! arguments and options; options are inherited by subcommands, which may
//! override or disable them. Invocations are parsed into a
//! [`ParsedPayload`] that carries every validation problem as data, and a
//! [`Dispatcher`] decides whether to run an option action, report errors,
//! run the command's action, or print help.
//!
//! ```
//! use cmdtree::{App, ArgumentSpec, OptionSpec};
//!
//! let mut app = App::new("fruit");
//! app.root_mut().option("ripeness", OptionSpec::value().short('r'));
//! app.subcommand(app.root(), "apple")
//!     .argument(ArgumentSpec::required("type"))?;
//!
//! let payload = app.parse(["fruit", "apple", "gala", "-r=9"]);
//! assert!(payload.is_ok());
//! assert_eq!(payload.command.qualified_name(), "apple");
//! assert_eq!(payload.arg("type"), Some("gala"));
//! # Ok::<(), cmdtree::TreeError>(())
//! ```

pub mod app;
pub mod definition;
pub mod dispatch;
pub mod parse;
pub mod render;
pub mod tree;

pub use app::App;
pub use definition::{Definition, DefinitionError};
pub use dispatch::{
    Action, ActionError, ActionOutcome, ActionResult, Completer, Dispatcher, Invocation, Outcome,
};
pub use parse::{
    ArgvTokenizer, DefaultCatalog, Diagnostic, ErrorCatalog, ErrorKind, OptionValue, ParseError,
    ParsedPayload, Parser, RawValue, Tokenizer, Tokens,
};
pub use render::{ColorMode, DefaultFormatter, MessageFormatter, set_color_mode};
pub use tree::{
    ArgumentSpec, CommandId, CommandMut, CommandRef, CommandTree, OptionAction, OptionSpec,
    TreeError,
};
