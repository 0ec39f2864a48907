/// Output formatting: JSON, table, path modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::types::{CommandOutput, CommandTreeOutput, ErrorOutput, ParseOutput};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    /// When true, print phase timings to stderr.
    pub debug: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool, debug: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
            debug,
        }
    }

    /// Start a named debug timer. Prints elapsed on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }
}

// --- Flat command list ---

/// Write a list of `CommandOutput` to stdout.
pub fn write_commands(items: &[CommandOutput], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Compact => print_compact_json(items),
        OutputFormat::Path => {
            for item in items.iter().filter(|i| !i.path.is_empty()) {
                println!("{}", item.path);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => write_commands_table(items, ctx),
    }
}

fn write_commands_table(items: &[CommandOutput], ctx: &OutputCtx) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["USAGE", "OPTIONS", "ACTION", "HELP"]);
    }
    for item in items {
        table.add_row([
            Cell::new(&item.usage),
            Cell::new(item.options),
            Cell::new(if item.action { "yes" } else { "" }),
            Cell::new(item.help.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
}

// --- Tree output ---

/// Write a command tree to stdout.
pub fn write_command_tree(root: &CommandTreeOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(root),
        OutputFormat::Compact => print_compact_json(root),
        OutputFormat::Path => print_tree_paths(root),
        OutputFormat::Table | OutputFormat::Auto => {
            println!("{}", root.name);
            let count = root.children.len();
            for (i, child) in root.children.iter().enumerate() {
                print_tree_visual(child, "", i + 1 == count);
            }
        }
    }
}

fn print_tree_paths(node: &CommandTreeOutput) {
    if !node.path.is_empty() {
        println!("{}", node.path);
    }
    for child in &node.children {
        print_tree_paths(child);
    }
}

fn print_tree_visual(node: &CommandTreeOutput, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    let help_str = node
        .help
        .as_deref()
        .map(|h| format!("  {h}"))
        .unwrap_or_default();
    println!("{prefix}{connector}{}{help_str}", node.name);

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        print_tree_visual(child, &child_prefix, i + 1 == child_count);
    }
}

// --- Parse result ---

/// Write a parse result to stdout.
pub fn write_parse(result: &ParseOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Compact => print_compact_json(result),
        OutputFormat::Path => println!("{}", result.command),
        OutputFormat::Table | OutputFormat::Auto => write_parse_table(result, ctx),
    }
}

fn write_parse_table(result: &ParseOutput, ctx: &OutputCtx) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["KIND", "NAME", "VALUE"]);
    }
    table.add_row(["command", "", result.command.as_str()]);
    for (name, value) in &result.args {
        table.add_row(["argument", name.as_str(), value.as_deref().unwrap_or("")]);
    }
    for (name, value) in &result.options {
        let value = serde_json::to_string(value).unwrap_or_default();
        table.add_row(["option", name.as_str(), value.as_str()]);
    }
    for error in &result.errors {
        table.add_row(["error", error.kind.as_str(), error.error.as_str()]);
    }
    println!("{table}");
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
            if let Some(candidates) = &err.error.candidates {
                let _ = writeln!(out, "  Did you mean:");
                for c in candidates {
                    let _ = writeln!(out, "    {c}");
                }
            }
        }
    }
}

// --- Debug timer ---

/// A RAII timer that prints elapsed milliseconds to stderr on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            eprintln!("[debug] {}: {ms:.2}ms", self.label);
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}
