#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! cmdtree: inspect, parse, and run command trees declared in TOML or JSON.

mod cli;
mod commands;
mod errors;
mod logging;
mod types;

use clap::Parser;

use cli::args::ColorChoice;
use cli::{Cli, OutputCtx, write_error};
use cmdtree::{ColorMode, set_color_mode};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.debug) {
        eprintln!("[warn] logging disabled: {err}");
    }

    set_color_mode(match cli.color {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    });

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header, cli.debug);

    match commands::dispatch(&cli.command, &ctx) {
        Ok(()) => {}
        Err(err) => {
            if !err.is_reported() {
                let error_output = ErrorOutput::from_cli_error(&err);
                write_error(&error_output, cli.output, cli.json);
            }
            std::process::exit(err.exit_code());
        }
    }
}
