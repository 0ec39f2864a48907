/// `run` command: dispatch an argv through the declared program.
use cmdtree::Outcome;
use tracing::debug;

use crate::cli::OutputCtx;
use crate::cli::args::RunArgs;
use crate::errors::CliError;

/// Run `cmdtree run`.
///
/// The declared program writes its own help, version, error, and output
/// messages to stdout.
///
/// # Errors
///
/// Returns `CliError::Rejected` if the argv did not validate and
/// `CliError::ActionFailed` if the command's action reported a failure.
pub fn run(args: &RunArgs, ctx: &OutputCtx) -> Result<(), CliError> {
    let (definition, app) = super::load_app(&args.file, ctx)?;

    let _t_dispatch = ctx.timer("dispatch");
    let outcome = app.run(super::program_argv(&definition, &args.argv))?;
    drop(_t_dispatch);

    debug!(?outcome, "dispatch finished");
    match outcome {
        Outcome::Rejected => Err(CliError::Rejected),
        Outcome::Failed(reason) => Err(CliError::ActionFailed(reason)),
        Outcome::Completed | Outcome::Help | Outcome::OptionAction => Ok(()),
    }
}
