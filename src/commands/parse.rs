/// `parse` command: show what an argv parses to, without running anything.
use crate::cli::OutputCtx;
use crate::cli::args::ParseArgs;
use crate::cli::output::write_parse;
use crate::errors::CliError;
use crate::types::ParseOutput;

/// Run `cmdtree parse`.
///
/// Parse errors are part of the output, not a failure of this command.
///
/// # Errors
///
/// Returns `CliError` if the definition cannot be loaded.
pub fn run(args: &ParseArgs, ctx: &OutputCtx) -> Result<(), CliError> {
    let (definition, app) = super::load_app(&args.file, ctx)?;

    let _t_parse = ctx.timer("parse");
    let payload = app.parse(super::program_argv(&definition, &args.argv));
    drop(_t_parse);

    write_parse(&ParseOutput::from(&payload), ctx);
    Ok(())
}
