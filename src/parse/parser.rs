/// Command path resolution and argument/option validation.
///
/// Parsing order:
///
/// 1. **Tokenize** argv into positionals and option tokens.
/// 2. **Resolve** the command path (first positional, colon-delimited) when
///    the root has subcommands, walking greedily segment by segment.
/// 3. **Arguments**: map the remaining positionals onto the resolved
///    command's declared arguments.
/// 4. **Options**: merge supplied option tokens over the defaults of the
///    command's effective options and check each value's shape.
///
/// Every problem is recorded and parsing carries on, so one call can report
/// several independent errors.
use indexmap::IndexMap;
use tracing::debug;

use super::{
    catalog::{DefaultCatalog, Diagnostic, ErrorCatalog, ParseError},
    payload::{OptionValue, ParsedPayload},
    tokenizer::{ArgvTokenizer, RawValue, Tokenizer, Tokens},
};
use crate::tree::{CommandRef, CommandTree, split_path};

/// Turns argv into a [`ParsedPayload`] for a given tree.
pub struct Parser {
    tokenizer: Box<dyn Tokenizer>,
    catalog: Box<dyn ErrorCatalog>,
}

impl Parser {
    /// Parser with the default tokenizer and error catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizer: Box::new(ArgvTokenizer::new()),
            catalog: Box::new(DefaultCatalog),
        }
    }

    /// Replace the tokenizer.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Replace the error catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl ErrorCatalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    /// The catalog used to render diagnostics.
    #[must_use]
    pub fn catalog(&self) -> &dyn ErrorCatalog {
        self.catalog.as_ref()
    }

    /// Parse a full argv (program name first) against `tree`.
    pub fn parse<'t, I, S>(&self, tree: &'t CommandTree, argv: I) -> ParsedPayload<'t>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let tokens = self.tokenizer.tokenize(&argv);
        self.parse_tokens(tree, tokens)
    }

    /// Parse already-tokenized input against `tree`.
    #[must_use]
    pub fn parse_tokens<'t>(&self, tree: &'t CommandTree, tokens: Tokens) -> ParsedPayload<'t> {
        let mut errors = Vec::new();

        let (command, positionals) = resolve_command(tree.root_command(), &tokens.positionals, &mut errors);
        let args = parse_arguments(command, positionals, &mut errors);
        let options = parse_options(command, &tokens.options, &mut errors);

        debug!(
            command = %command.qualified_name(),
            errors = errors.len(),
            "parsed invocation"
        );

        let errors = errors
            .into_iter()
            .map(|error| Diagnostic::new(error, self.catalog.as_ref()))
            .collect();

        ParsedPayload {
            command,
            args,
            options,
            errors,
            raw: tokens,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the command path and return the deepest command reached together
/// with the positionals that belong to it.
fn resolve_command<'t, 'a>(
    root: CommandRef<'t>,
    positionals: &'a [String],
    errors: &mut Vec<ParseError>,
) -> (CommandRef<'t>, &'a [String]) {
    if !root.has_children() {
        return (root, positionals);
    }
    let Some((path, rest)) = positionals.split_first() else {
        return (root, positionals);
    };

    let segments = split_path(path);
    let mut current = root;
    let mut consumed = 0;
    while let Some(child) = segments.get(consumed).and_then(|s| current.child(s)) {
        current = child;
        consumed += 1;
    }

    if let Some(unresolved) = segments.get(consumed) {
        debug!(path = %path, unresolved = %unresolved, "command path did not resolve");
        errors.push(ParseError::CommandNotFound {
            path: path.clone(),
            unresolved: (*unresolved).to_owned(),
        });
    }

    (current, rest)
}

fn parse_arguments(
    command: CommandRef<'_>,
    positionals: &[String],
    errors: &mut Vec<ParseError>,
) -> IndexMap<String, Option<String>> {
    let declared = command.arguments();

    if positionals.len() > declared.len() {
        errors.push(ParseError::TooManyArguments {
            expected: declared.len(),
            actual: positionals.len(),
        });
    }

    declared
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let value = positionals.get(index).cloned();
            if value.is_none() && !spec.optional {
                errors.push(ParseError::MissingArgument {
                    name: spec.name.clone(),
                });
            }
            (spec.name.clone(), value)
        })
        .collect()
}

fn parse_options(
    command: CommandRef<'_>,
    supplied: &IndexMap<String, RawValue>,
    errors: &mut Vec<ParseError>,
) -> IndexMap<String, OptionValue> {
    let allowed = command.effective_options();

    let mut options: IndexMap<String, OptionValue> = allowed
        .iter()
        .map(|(&name, spec)| {
            let default = if spec.flag {
                OptionValue::Flag(false)
            } else {
                OptionValue::Value(None)
            };
            (name.to_owned(), default)
        })
        .collect();

    for (key, raw) in supplied {
        let value = OptionValue::from(raw.clone());
        match allowed.iter().find(|(name, spec)| spec.matches(name, key)) {
            Some((&name, _)) => {
                options.insert(name.to_owned(), value);
            }
            None => {
                errors.push(ParseError::OptionNotAllowed { name: key.clone() });
                options.insert(key.clone(), value);
            }
        }
    }

    for (name, value) in &options {
        let Some(spec) = allowed.get(name.as_str()) else {
            continue;
        };
        match (spec.flag, value) {
            (true, OptionValue::Value(_)) => {
                errors.push(ParseError::FlagWithValue { name: name.clone() });
            }
            (false, OptionValue::Flag(_)) => {
                errors.push(ParseError::OptionNeedsValue { name: name.clone() });
            }
            _ => {}
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse::catalog::ErrorKind;
    use crate::tree::{ArgumentSpec, OptionSpec};

    fn flag(on: bool) -> OptionValue {
        OptionValue::Flag(on)
    }

    fn value(v: Option<&str>) -> OptionValue {
        OptionValue::Value(v.map(str::to_owned))
    }

    fn options(entries: &[(&str, OptionValue)]) -> IndexMap<String, OptionValue> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn args(entries: &[(&str, Option<&str>)]) -> IndexMap<String, Option<String>> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.map(str::to_owned)))
            .collect()
    }

    fn messages<'a>(payload: &'a ParsedPayload<'_>) -> Vec<(ErrorKind, &'a str)> {
        payload
            .errors
            .iter()
            .map(|d| (d.kind(), d.message.as_str()))
            .collect()
    }

    fn blank() -> CommandTree {
        let mut tree = CommandTree::new("fruit");
        tree.root_mut()
            .option("help", OptionSpec::flag())
            .option("version", OptionSpec::flag());
        tree
    }

    fn simple() -> CommandTree {
        let mut tree = blank();
        tree.root_mut()
            .option("ripeness", OptionSpec::value().short('r'))
            .option("reduced", OptionSpec::flag())
            .argument(ArgumentSpec::required("name"))
            .unwrap();
        tree
    }

    /// `fruit` with `apple <type>` and `coconut` (adds `hardness`, drops `ripeness`).
    fn with_subcommands() -> CommandTree {
        let mut tree = CommandTree::new("fruit");
        tree.root_mut()
            .option("ripeness", OptionSpec::value().short('r'))
            .option("reduced", OptionSpec::flag());
        tree.subcommand(tree.root(), "apple")
            .argument(ArgumentSpec::required("type"))
            .unwrap();
        tree.subcommand(tree.root(), "coconut")
            .option("hardness", OptionSpec::value())
            .disable_option("ripeness");
        tree
    }

    /// `fruit` with `banana` (adds `colour`, drops `ripeness`) and `banana:plantain <flavour>`.
    fn nested() -> CommandTree {
        let mut tree = CommandTree::new("fruit");
        tree.root_mut()
            .option("ripeness", OptionSpec::value().short('r'))
            .option("reduced", OptionSpec::flag());
        let banana = tree
            .subcommand(tree.root(), "banana")
            .disable_option("ripeness")
            .option("colour", OptionSpec::value())
            .id();
        tree.subcommand(banana, "plantain")
            .argument(ArgumentSpec::required("flavour"))
            .unwrap();
        tree
    }

    #[test]
    fn test_blank_input() {
        let tree = blank();
        let payload = Parser::new().parse(&tree, ["fruit"]);

        assert_eq!(payload.command, tree.root_command());
        assert!(payload.args.is_empty());
        assert_eq!(
            payload.options,
            options(&[("help", flag(false)), ("version", flag(false))])
        );
        assert!(payload.is_ok());
        assert_eq!(payload.raw, Tokens::default());
    }

    #[test]
    fn test_invalid_input_keeps_unknown_option() {
        let tree = blank();
        let payload = Parser::new().parse(&tree, ["fruit", "--cactus", "banana", "plantain"]);

        assert_eq!(
            payload.options,
            options(&[
                ("help", flag(false)),
                ("version", flag(false)),
                ("cactus", flag(true)),
            ])
        );
        assert_eq!(
            messages(&payload),
            vec![
                (ErrorKind::Argument, "Too many arguments, expected 0 got 2"),
                (ErrorKind::Option, "Option --cactus not allowed"),
            ]
        );
        assert_eq!(payload.raw.positionals, vec!["banana", "plantain"]);
    }

    #[test]
    fn test_simple_command_valid() {
        let tree = simple();
        let payload = Parser::new().parse(&tree, ["fruit", "apple", "-r=9", "--reduced"]);

        assert_eq!(payload.args, args(&[("name", Some("apple"))]));
        assert_eq!(
            payload.options,
            options(&[
                ("help", flag(false)),
                ("version", flag(false)),
                ("ripeness", value(Some("9"))),
                ("reduced", flag(true)),
            ])
        );
        assert!(payload.is_ok());
        assert_eq!(payload.raw.options["r"], RawValue::Text("9".to_owned()));
    }

    #[test]
    fn test_too_many_arguments_still_maps_declared() {
        let mut tree = CommandTree::new("fruit");
        tree.root_mut()
            .arguments([
                ArgumentSpec::required("apple"),
                ArgumentSpec::required("banana"),
                ArgumentSpec::optional("cherry"),
            ])
            .unwrap();

        let payload = Parser::new().parse(&tree, ["fruit", "a", "b", "c", "d"]);
        assert_eq!(
            payload.args,
            args(&[("apple", Some("a")), ("banana", Some("b")), ("cherry", Some("c"))])
        );
        assert_eq!(
            payload.errors.iter().map(|d| d.error.clone()).collect::<Vec<_>>(),
            vec![ParseError::TooManyArguments {
                expected: 3,
                actual: 4
            }]
        );
    }

    #[test]
    fn test_missing_required_in_declaration_order() {
        let mut tree = CommandTree::new("fruit");
        tree.root_mut()
            .arguments([
                ArgumentSpec::required("apple"),
                ArgumentSpec::required("banana"),
                ArgumentSpec::required("cherry"),
                ArgumentSpec::optional("date"),
            ])
            .unwrap();

        let payload = Parser::new().parse(&tree, ["fruit", "a"]);
        assert_eq!(
            payload.args,
            args(&[
                ("apple", Some("a")),
                ("banana", None),
                ("cherry", None),
                ("date", None),
            ])
        );
        assert_eq!(
            messages(&payload),
            vec![
                (ErrorKind::Argument, "Argument <banana> is required"),
                (ErrorKind::Argument, "Argument <cherry> is required"),
            ]
        );
    }

    #[test]
    fn test_short_and_long_last_write_wins() {
        let tree = simple();
        let payload = Parser::new().parse(&tree, ["fruit", "x", "-r=1", "--ripeness=2"]);
        assert_eq!(payload.option("ripeness"), Some(&value(Some("2"))));

        let payload = Parser::new().parse(&tree, ["fruit", "x", "--ripeness=2", "-r=1"]);
        assert_eq!(payload.option("ripeness"), Some(&value(Some("1"))));
        assert!(payload.is_ok());
    }

    #[test]
    fn test_shape_errors() {
        let tree = simple();
        let payload = Parser::new().parse(&tree, ["fruit", "x", "--reduced=yes", "--ripeness"]);

        assert_eq!(payload.option("reduced"), Some(&value(Some("yes"))));
        assert_eq!(payload.option("ripeness"), Some(&flag(true)));
        assert_eq!(
            payload.errors.iter().map(|d| d.error.subkind()).collect::<Vec<_>>(),
            vec!["shouldHaveValue", "shouldNotHaveValue"]
        );
    }

    #[test]
    fn test_base_command_of_tree() {
        let tree = with_subcommands();
        let payload = Parser::new().parse(&tree, ["fruit"]);

        assert_eq!(payload.command, tree.root_command());
        assert!(payload.args.is_empty());
        assert_eq!(
            payload.options,
            options(&[("ripeness", value(None)), ("reduced", flag(false))])
        );
        assert!(payload.is_ok());
    }

    #[test]
    fn test_subcommand_with_arguments() {
        let tree = with_subcommands();
        let payload = Parser::new().parse(&tree, ["fruit", "apple", "granny smith"]);

        assert_eq!(payload.command.qualified_name(), "apple");
        assert_eq!(payload.args, args(&[("type", Some("granny smith"))]));
        assert_eq!(payload.raw.positionals, vec!["apple", "granny smith"]);
        assert!(payload.is_ok());
    }

    #[test]
    fn test_subcommand_with_different_options() {
        let tree = with_subcommands();
        let payload = Parser::new().parse(&tree, ["fruit", "coconut", "--hardness=70%"]);

        assert_eq!(payload.command.name(), "coconut");
        assert!(payload.args.is_empty());
        assert_eq!(
            payload.options,
            options(&[("reduced", flag(false)), ("hardness", value(Some("70%")))])
        );
        assert!(payload.option("ripeness").is_none());
        assert!(payload.is_ok());
    }

    #[test]
    fn test_disabled_option_not_allowed_on_child() {
        let tree = with_subcommands();
        let payload = Parser::new().parse(&tree, ["fruit", "coconut", "--ripeness=3"]);
        assert_eq!(
            messages(&payload),
            vec![(ErrorKind::Option, "Option --ripeness not allowed")]
        );
    }

    #[test]
    fn test_unknown_subcommand() {
        let tree = with_subcommands();
        let payload = Parser::new().parse(&tree, ["fruit", "banana", "--reduced"]);

        assert_eq!(payload.command, tree.root_command());
        assert!(payload.args.is_empty());
        assert_eq!(
            payload.options,
            options(&[("ripeness", value(None)), ("reduced", flag(true))])
        );
        assert_eq!(
            messages(&payload),
            vec![(ErrorKind::Command, "Command \"banana\" not found")]
        );
        assert!(payload.has_command_error());
    }

    #[test]
    fn test_unknown_nested_subcommand_reports_full_path() {
        let tree = with_subcommands();
        let payload = Parser::new().parse(&tree, ["fruit", "banana:plantain"]);
        assert_eq!(payload.command, tree.root_command());
        assert_eq!(
            messages(&payload),
            vec![(ErrorKind::Command, "Command \"banana:plantain\" not found")]
        );
    }

    #[test]
    fn test_nested_subcommand() {
        let tree = nested();
        let payload = Parser::new().parse(
            &tree,
            ["fruit", "banana:plantain", "--colour=green", "sweet"],
        );

        assert_eq!(payload.command.qualified_name(), "banana:plantain");
        assert_eq!(payload.args, args(&[("flavour", Some("sweet"))]));
        assert_eq!(
            payload.options,
            options(&[("reduced", flag(false)), ("colour", value(Some("green")))])
        );
        assert!(payload.is_ok());
    }

    #[test]
    fn test_partial_resolution_parses_against_deepest_node() {
        let tree = nested();
        let payload = Parser::new().parse(&tree, ["fruit", "banana:plantain:acuminata"]);

        assert_eq!(payload.command.qualified_name(), "banana:plantain");
        assert_eq!(payload.args, args(&[("flavour", None)]));
        assert_eq!(
            payload.options,
            options(&[("reduced", flag(false)), ("colour", value(None))])
        );
        assert_eq!(
            payload.errors.first().map(|d| d.error.clone()),
            Some(ParseError::CommandNotFound {
                path: "banana:plantain:acuminata".to_owned(),
                unresolved: "acuminata".to_owned(),
            })
        );
        assert_eq!(
            payload.errors.iter().filter(|d| d.kind() == ErrorKind::Command).count(),
            1
        );
    }

    #[test]
    fn test_error_order_command_argument_option() {
        let tree = nested();
        let payload = Parser::new().parse(
            &tree,
            ["fruit", "banana:nope", "extra", "--unknown"],
        );
        let kinds: Vec<ErrorKind> = payload.errors.iter().map(Diagnostic::kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::Command, ErrorKind::Argument, ErrorKind::Option]
        );
    }

    #[test]
    fn test_root_without_children_takes_all_positionals() {
        let tree = blank();
        let payload = Parser::new().parse(&tree, ["fruit", "cactus"]);
        assert_eq!(
            messages(&payload),
            vec![(ErrorKind::Argument, "Too many arguments, expected 0 got 1")]
        );
    }

    #[test]
    fn test_custom_catalog_and_tokenizer() {
        struct Loud;
        impl ErrorCatalog for Loud {
            fn option_not_allowed(&self, name: &str) -> String {
                format!("NO {name}")
            }
        }

        let tree = blank();
        let parser = Parser::new()
            .with_catalog(Loud)
            .with_tokenizer(ArgvTokenizer::skipping(2));
        let payload = parser.parse(&tree, ["node", "fruit.js", "--cactus"]);
        assert_eq!(
            messages(&payload),
            vec![(ErrorKind::Option, "NO cactus")]
        );
    }
}
