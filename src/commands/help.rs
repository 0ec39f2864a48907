/// `help` command: the rendered help message for one command.
use cmdtree::tree::{CommandRef, split_path, suggest};
use cmdtree::{DefaultFormatter, MessageFormatter};

use crate::cli::OutputCtx;
use crate::cli::args::HelpArgs;
use crate::errors::CliError;

/// Run `cmdtree help`.
///
/// # Errors
///
/// Returns `CliError::CommandNotFound` (with close matches as candidates) if
/// the path does not resolve.
pub fn run(args: &HelpArgs, ctx: &OutputCtx) -> Result<(), CliError> {
    let (_, app) = super::load_app(&args.file, ctx)?;
    let path = args.path.as_deref().unwrap_or("");
    let command = resolve(app.root_command(), path)?;
    println!("{}", DefaultFormatter.help(command));
    Ok(())
}

fn resolve<'t>(root: CommandRef<'t>, path: &str) -> Result<CommandRef<'t>, CliError> {
    let mut current = root;
    for segment in split_path(path) {
        match current.child(segment) {
            Some(child) => current = child,
            None => {
                return Err(CliError::CommandNotFound {
                    path: path.to_owned(),
                    candidates: suggest(current, segment),
                });
            }
        }
    }
    Ok(current)
}
