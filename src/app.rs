/// Program entry point: a command tree with its dispatcher.
use std::io;

use tracing::debug;

use crate::{
    dispatch::{Dispatcher, Outcome},
    parse::{ParsedPayload, Parser},
    render::MessageFormatter,
    tree::{CommandId, CommandMut, CommandRef, CommandTree, OptionAction, OptionSpec},
};

/// A command-line program.
///
/// ```no_run
/// use cmdtree::{ActionOutcome, App, ArgumentSpec};
///
/// let mut app = App::new("fruit");
/// app.root_mut().version("1.2.3");
/// app.subcommand(app.root(), "apple")
///     .argument(ArgumentSpec::required("type"))?
///     .action(|invocation, _| {
///         println!("a {} apple", invocation.arg("type").unwrap_or_default());
///         ActionOutcome::ok()
///     });
///
/// app.run_and_exit(std::env::args())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct App {
    tree: CommandTree,
    dispatcher: Dispatcher,
}

impl App {
    /// Program with built-in `--help (-h)` and `--version (-v)` options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut app = Self::bare(name);
        app.root_mut()
            .option(
                "help",
                OptionSpec::flag()
                    .short('h')
                    .help("Show this help message")
                    .action(OptionAction::ShowHelp),
            )
            .option(
                "version",
                OptionSpec::flag()
                    .short('v')
                    .help("Show the program version")
                    .action(OptionAction::ShowVersion),
            );
        app
    }

    /// Program without built-in options.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            tree: CommandTree::new(name),
            dispatcher: Dispatcher::new(),
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.dispatcher = self.dispatcher.with_parser(parser);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.dispatcher = self.dispatcher.with_formatter(formatter);
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl io::Write + 'static) -> Self {
        self.dispatcher = self.dispatcher.with_output(output);
        self
    }

    #[must_use]
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut CommandTree {
        &mut self.tree
    }

    #[must_use]
    pub fn root(&self) -> CommandId {
        self.tree.root()
    }

    #[must_use]
    pub fn root_command(&self) -> CommandRef<'_> {
        self.tree.root_command()
    }

    pub fn root_mut(&mut self) -> CommandMut<'_> {
        self.tree.root_mut()
    }

    /// Register a subcommand under `parent` and return its builder.
    pub fn subcommand(&mut self, parent: CommandId, name: impl Into<String>) -> CommandMut<'_> {
        self.tree.subcommand(parent, name)
    }

    /// Parse without dispatching.
    pub fn parse<I, S>(&self, argv: I) -> ParsedPayload<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatcher.parser().parse(&self.tree, argv)
    }

    /// Parse and dispatch `argv`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn run<I, S>(&self, argv: I) -> io::Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatcher.run(&self.tree, argv)
    }

    /// Dispatch the process arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn run_env(&self) -> io::Result<Outcome> {
        self.run(std::env::args())
    }

    /// Dispatch `argv`, exiting the process with status 1 if an action failed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn run_and_exit<I, S>(&self, argv: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let outcome = self.run(argv)?;
        if let Outcome::Failed(reason) = &outcome {
            debug!(%reason, "exiting after action failure");
            std::process::exit(outcome.exit_code());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io::Write, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        dispatch::ActionOutcome,
        parse::{ArgvTokenizer, OptionValue},
        render::strip,
        tree::ArgumentSpec,
    };

    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Sink {
        fn text(&self) -> String {
            strip(&String::from_utf8_lossy(&self.0.borrow()))
        }
    }

    fn keys(command: CommandRef<'_>) -> Vec<&str> {
        command.effective_options().keys().copied().collect()
    }

    #[test]
    fn test_builtin_options() {
        let app = App::new("fruit");
        assert_eq!(keys(app.root_command()), vec!["help", "version"]);
        assert!(App::bare("fruit").root_command().effective_options().is_empty());
    }

    #[test]
    fn test_builtins_inherited_and_disabled() {
        let mut app = App::new("fruit");
        app.root_mut().option("foo", OptionSpec::value());
        let apple = app
            .subcommand(app.root(), "apple")
            .option("bar", OptionSpec::value())
            .disable_option("version")
            .id();
        let granny = app
            .subcommand(apple, "granny-smith")
            .option("zim", OptionSpec::value())
            .id();

        assert_eq!(keys(app.root_command()), vec!["help", "version", "foo"]);
        assert_eq!(keys(app.tree().get(apple)), vec!["help", "foo", "bar"]);
        assert_eq!(
            keys(app.tree().get(granny)),
            vec!["help", "foo", "bar", "zim"]
        );
    }

    #[test]
    fn test_parse_includes_builtin_defaults() {
        let mut app = App::new("fruit");
        app.root_mut()
            .option("foo", OptionSpec::flag().short('f'))
            .option("bar", OptionSpec::value());

        let payload = app.parse(["fruit", "-f", "--bar=value", "--help", "-v"]);
        assert!(payload.is_ok());
        assert_eq!(
            payload
                .options
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone()))
                .collect::<Vec<_>>(),
            vec![
                ("help", OptionValue::Flag(true)),
                ("version", OptionValue::Flag(true)),
                ("foo", OptionValue::Flag(true)),
                ("bar", OptionValue::Value(Some("value".to_owned()))),
            ]
        );
    }

    #[test]
    fn test_run_writes_version() {
        let sink = Sink::default();
        let mut app = App::new("fruit").with_output(sink.clone());
        app.root_mut().version("1.2.3");

        assert_eq!(app.run(["fruit", "--version"]).unwrap(), Outcome::OptionAction);
        assert_eq!(sink.text(), "fruit version 1.2.3\n");
    }

    #[test]
    fn test_run_help_for_subcommand_flag() {
        let sink = Sink::default();
        let mut app = App::new("fruit").with_output(sink.clone());
        app.subcommand(app.root(), "apple")
            .help("Gives you an apple")
            .argument(ArgumentSpec::required("type"))
            .unwrap();

        app.run(["fruit", "apple", "-h"]).unwrap();
        let text = sink.text();
        assert!(text.starts_with("Description:\n  Gives you an apple\n"));
        assert!(text.contains("  fruit apple <type>\n"));
        assert!(text.contains("  --help (-h)     Show this help message"));
    }

    #[test]
    fn test_custom_parser() {
        let sink = Sink::default();
        let mut app = App::new("fruit")
            .with_parser(Parser::new().with_tokenizer(ArgvTokenizer::skipping(2)))
            .with_output(sink.clone());
        app.root_mut()
            .argument(ArgumentSpec::required("name"))
            .unwrap()
            .action(|invocation, _| {
                if invocation.arg("name") == Some("apple") {
                    ActionOutcome::ok()
                } else {
                    ActionOutcome::fail("apples only")
                }
            });

        assert_eq!(
            app.run(["node", "fruit.js", "apple"]).unwrap(),
            Outcome::Completed
        );
        let outcome = app.run(["node", "fruit.js", "pear"]).unwrap();
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(sink.text(), "Error: apples only\n");
    }
}
