/// Terminal colors for rendered messages.
use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid SGR regex"));

/// When rendered messages carry color codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Follow the terminal and the `NO_COLOR`/`CLICOLOR` environment.
    #[default]
    Auto,
    /// Always emit color codes.
    Always,
    /// Never emit color codes.
    Never,
}

/// Set the process-wide color mode.
pub fn set_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Auto => colored::control::unset_override(),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
    }
}

#[must_use]
pub fn green(text: &str) -> String {
    text.green().to_string()
}

#[must_use]
pub fn red(text: &str) -> String {
    text.red().to_string()
}

#[must_use]
pub fn cyan(text: &str) -> String {
    text.cyan().to_string()
}

/// Remove color codes, leaving the plain text.
#[must_use]
pub fn strip(text: &str) -> String {
    ANSI_SGR.replace_all(text, "").into_owned()
}
