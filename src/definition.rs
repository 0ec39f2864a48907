/// Declarative command trees loaded from TOML or JSON files.
///
/// ```toml
/// name = "fruit"
/// version = "1.2.3"
///
/// [options.ripeness]
/// short = "r"
///
/// [commands.apple]
/// output = "Here is a {type} apple"
/// arguments = [{ name = "type" }]
///
/// [commands.coconut.options]
/// hardness = {}
/// ripeness = false
/// ```
use std::{
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    app::App,
    dispatch::{ActionError, ActionOutcome, Invocation},
    parse::OptionValue,
    tree::{ArgumentSpec, CommandId, CommandTree, OptionSpec, TreeError},
};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_-]+)\}").expect("valid placeholder regex"));

/// Errors loading or building a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Invalid TOML.
    #[error("Invalid TOML definition: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid JSON.
    #[error("Invalid JSON definition: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("Unsupported definition format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    /// The declarations are inconsistent.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl DefinitionError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 4,
            Self::Toml(_) | Self::Json(_) | Self::UnsupportedFormat(_) | Self::Tree(_) => 2,
        }
    }
}

/// A whole program: the root command plus its name.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    /// Program name.
    pub name: String,
    /// Whether to declare `--help` and `--version` on the root.
    #[serde(default = "enabled")]
    pub builtins: bool,
    /// The root command.
    #[serde(flatten)]
    pub root: CommandDef,
}

fn enabled() -> bool {
    true
}

/// One command and its subcommands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandDef {
    pub help: Option<String>,
    pub version: Option<String>,
    pub options: IndexMap<String, OptionDef>,
    pub arguments: Vec<ArgumentDef>,
    pub commands: IndexMap<String, CommandDef>,
    /// Printed when the command runs; `{name}` expands to an argument or option.
    pub output: Option<String>,
    /// Failure message reported when the command runs; expanded like `output`.
    pub fail: Option<String>,
}

/// An option entry: `false` disables, `true` declares a value option.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionDef {
    Toggle(bool),
    Spec(OptionFields),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptionFields {
    pub short: Option<char>,
    pub flag: bool,
    pub help: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub help: Option<String>,
}

impl Definition {
    /// Load a definition, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or does not decode.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if extension != "toml" && extension != "json" {
            return Err(DefinitionError::UnsupportedFormat(extension));
        }

        let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), format = %extension, "loading definition");

        if extension == "toml" {
            Self::from_toml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    /// # Errors
    ///
    /// Returns an error if `text` is not a valid TOML definition.
    pub fn from_toml(text: &str) -> Result<Self, DefinitionError> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns an error if `text` is not a valid JSON definition.
    pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build a runnable program.
    ///
    /// # Errors
    ///
    /// Returns an error if argument declarations are inconsistent.
    pub fn build(&self) -> Result<App, DefinitionError> {
        let mut app = if self.builtins {
            App::new(&self.name)
        } else {
            App::bare(&self.name)
        };
        let root = app.root();
        declare(app.tree_mut(), root, &self.root)?;
        Ok(app)
    }
}

fn declare(tree: &mut CommandTree, id: CommandId, def: &CommandDef) -> Result<(), DefinitionError> {
    let mut command = tree.command_mut(id);

    if let Some(help) = &def.help {
        command.help(help);
    }
    if let Some(version) = &def.version {
        command.version(version);
    }

    for (name, option) in &def.options {
        match option {
            OptionDef::Toggle(false) => {
                command.disable_option(name);
            }
            OptionDef::Toggle(true) => {
                command.option(name, OptionSpec::value());
            }
            OptionDef::Spec(fields) => {
                command.option(name, fields.to_spec());
            }
        }
    }

    command.arguments(def.arguments.iter().map(ArgumentDef::to_spec))?;

    if def.output.is_some() || def.fail.is_some() {
        let output = def.output.clone();
        let fail = def.fail.clone();
        command.action(move |invocation, _| {
            if let Some(template) = &output {
                let text = render_template(template, invocation);
                if let Err(error) = invocation.println(&text) {
                    return ActionOutcome::Done(Err(anyhow::Error::new(error).into()));
                }
            }
            match &fail {
                Some(template) => {
                    ActionOutcome::Done(Err(ActionError::msg(render_template(template, invocation))))
                }
                None => ActionOutcome::ok(),
            }
        });
    }

    for (name, child) in &def.commands {
        let child_id = tree.add_child(id, name);
        declare(tree, child_id, child)?;
    }
    Ok(())
}

impl OptionFields {
    fn to_spec(&self) -> OptionSpec {
        let mut spec = if self.flag {
            OptionSpec::flag()
        } else {
            OptionSpec::value()
        };
        if let Some(short) = self.short {
            spec = spec.short(short);
        }
        if let Some(help) = &self.help {
            spec = spec.help(help);
        }
        if self.hidden {
            spec = spec.hidden();
        }
        spec
    }
}

impl ArgumentDef {
    fn to_spec(&self) -> ArgumentSpec {
        let spec = if self.optional {
            ArgumentSpec::optional(&self.name)
        } else {
            ArgumentSpec::required(&self.name)
        };
        match &self.help {
            Some(help) => spec.help(help),
            None => spec,
        }
    }
}

/// Expand `{name}` placeholders from the invocation's arguments, then options.
///
/// Absent values expand to nothing; flags expand to `true` or `false`.
#[must_use]
pub fn render_template(template: &str, invocation: &Invocation<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            if let Some(value) = invocation.args().get(key) {
                return value.clone().unwrap_or_default();
            }
            match invocation.option(key) {
                Some(OptionValue::Flag(on)) => on.to_string(),
                Some(OptionValue::Value(value)) => value.clone().unwrap_or_default(),
                None => String::new(),
            }
        })
        .into_owned()
}
