/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod help;
pub mod list;
pub mod parse;
pub mod run;

use std::path::Path;

use cmdtree::{App, Definition};

use crate::cli::OutputCtx;
use crate::cli::args::Command;
use crate::errors::CliError;

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `CliError` on any command failure.
pub fn dispatch(command: &Command, ctx: &OutputCtx) -> Result<(), CliError> {
    match command {
        Command::List(args) => list::run(args, ctx),
        Command::Parse(args) => parse::run(args, ctx),
        Command::Help(args) => help::run(args, ctx),
        Command::Run(args) => run::run(args, ctx),
    }
}

/// Load a definition file and build its program.
fn load_app(path: &Path, ctx: &OutputCtx) -> Result<(Definition, App), CliError> {
    let _t_load = ctx.timer("load_definition");
    let definition = Definition::load(path)?;
    let app = definition.build()?;
    Ok((definition, app))
}

/// The declared program's argv: its name followed by `rest`.
fn program_argv(definition: &Definition, rest: &[String]) -> Vec<String> {
    std::iter::once(definition.name.clone())
        .chain(rest.iter().cloned())
        .collect()
}
