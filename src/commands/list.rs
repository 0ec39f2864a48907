/// `list` command: every command declared in a definition file.
use crate::cli::OutputCtx;
use crate::cli::args::ListArgs;
use crate::cli::output::{write_command_tree, write_commands};
use crate::errors::CliError;
use crate::types::{CommandOutput, CommandTreeOutput};

/// Run `cmdtree list`.
///
/// # Errors
///
/// Returns `CliError` if the definition cannot be loaded.
pub fn run(args: &ListArgs, ctx: &OutputCtx) -> Result<(), CliError> {
    let (_, app) = super::load_app(&args.file, ctx)?;

    if args.tree {
        write_command_tree(&CommandTreeOutput::from_command(app.root_command()), ctx);
    } else {
        let items: Vec<CommandOutput> = app
            .tree()
            .walk()
            .into_iter()
            .map(CommandOutput::from_command)
            .collect();
        write_commands(&items, ctx);
    }
    Ok(())
}
