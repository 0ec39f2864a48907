/// Help, version, and error messages for a command.
use super::{
    lines::LineMapper,
    style::{cyan, green, red},
};
use crate::{
    dispatch::ActionError,
    parse::{Diagnostic, ParseError},
    tree::{ArgumentSpec, CommandRef, OptionSpec, suggest},
};

/// Renders the messages the dispatcher writes.
pub trait MessageFormatter {
    /// Full help for `command`.
    fn help(&self, command: CommandRef<'_>) -> String;

    /// `{program} version {version}`.
    fn version(&self, command: CommandRef<'_>) -> String;

    /// Help for `command` followed by the parse errors.
    fn error(&self, command: CommandRef<'_>, errors: &[Diagnostic]) -> String;

    /// A failure reported by an action.
    fn failure(&self, command: CommandRef<'_>, error: &ActionError) -> String;
}

/// Column-aligned help in `Description`, `Usage`, `Arguments`,
/// `Subcommands`, and `Options` sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl MessageFormatter for DefaultFormatter {
    fn help(&self, command: CommandRef<'_>) -> String {
        let program = command.program_name();
        let qualified = command.qualified_name();

        let arguments = command.arguments();
        let args: Vec<String> = arguments.iter().map(ArgumentSpec::usage).collect();
        let args_help: Vec<&str> = arguments
            .iter()
            .map(|a| a.help.as_deref().unwrap_or(""))
            .collect();

        let options: Vec<(&str, &OptionSpec)> = command
            .effective_options()
            .into_iter()
            .filter(|(_, spec)| !spec.hidden)
            .collect();
        let opts: Vec<String> = options
            .iter()
            .map(|(name, spec)| option_usage(name, spec))
            .collect();
        let opts_help: Vec<&str> = options
            .iter()
            .map(|(_, spec)| spec.help.as_deref().unwrap_or(""))
            .collect();

        let subcommands: Vec<String> = command
            .children()
            .map(|c| format!("{program} {}", c.qualified_name()))
            .collect();
        let subcommands_help: Vec<&str> = command.children().map(|c| c.help().unwrap_or("")).collect();

        let padding = args
            .iter()
            .chain(&opts)
            .chain(&subcommands)
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
            + 2;

        let args_usage = args.join(" ");
        let usage = [program, qualified.as_str(), args_usage.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut message = LineMapper::default()
            .add(green("Description:"))
            .add(format!("  {}", command.help().unwrap_or("none")))
            .add("")
            .add(green("Usage:"))
            .add(format!("  {usage}"))
            .add("")
            .add(green("Arguments:"))
            .add(section(&args, &args_help, padding))
            .add("");

        if !subcommands.is_empty() {
            message = message
                .add(green("Subcommands:"))
                .add(section(&subcommands, &subcommands_help, padding))
                .add("");
        }

        message
            .add(green("Options:"))
            .add(section(&opts, &opts_help, padding))
            .join("\n")
    }

    fn version(&self, command: CommandRef<'_>) -> String {
        let version = command
            .version()
            .or_else(|| command.root().version())
            .unwrap_or("unknown");
        format!("{} version {}", green(command.program_name()), cyan(version))
    }

    fn error(&self, command: CommandRef<'_>, errors: &[Diagnostic]) -> String {
        let messages = LineMapper::new(errors.iter().map(|d| d.message.as_str())).indent("  ");

        let candidates: Vec<String> = errors
            .iter()
            .filter_map(|d| match &d.error {
                ParseError::CommandNotFound { unresolved, .. } => Some(suggest(command, unresolved)),
                _ => None,
            })
            .flatten()
            .collect();

        let mut message = LineMapper::new([self.help(command), String::new(), red("Error:")])
            .lines(messages.into_lines());
        if !candidates.is_empty() {
            message = message.add(format!("  Did you mean {}?", candidates.join(", ")));
        }
        message.join("\n")
    }

    fn failure(&self, _command: CommandRef<'_>, error: &ActionError) -> String {
        format!("{} {error}", red("Error:"))
    }
}

fn option_usage(name: &str, spec: &OptionSpec) -> String {
    let value = if spec.flag { "" } else { "=<value>" };
    match spec.short {
        Some(short) => format!("--{name}{value} (-{short})"),
        None => format!("--{name}{value}"),
    }
}

fn section(entries: &[String], help: &[&str], padding: usize) -> String {
    let body = LineMapper::new(entries.iter().map(String::as_str))
        .pad(padding, ' ')
        .concat(help)
        .indent("  ")
        .trim()
        .join("\n");
    if body.is_empty() { "  none".to_owned() } else { body }
}
