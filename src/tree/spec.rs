/// Declarations attached to a command: options and positional arguments.
use crate::dispatch::Action;

/// What happens when an option is present and truthy at dispatch time.
///
/// The built-in variants are rendered by the dispatcher through its
/// [`MessageFormatter`](crate::render::MessageFormatter); `Custom` runs a
/// caller-supplied callback instead of the command's own action.
#[derive(Debug, Clone)]
pub enum OptionAction {
    /// Write the resolved command's help message.
    ShowHelp,
    /// Write the program version.
    ShowVersion,
    /// Run a callback.
    Custom(Action),
}

/// Declares one recognized option.
#[derive(Debug, Clone, Default)]
pub struct OptionSpec {
    /// Single-character alias, matched as `-x`.
    pub short: Option<char>,
    /// `true` for boolean options that never take a value.
    pub flag: bool,
    /// One-line description for help output.
    pub help: Option<String>,
    /// Accepted while parsing but left out of help output.
    pub hidden: bool,
    /// Pre-empts the command's action when the option is truthy.
    pub action: Option<OptionAction>,
}

impl OptionSpec {
    /// A value option (`--name=<value>`).
    #[must_use]
    pub fn value() -> Self {
        Self::default()
    }

    /// A flag option (`--name`).
    #[must_use]
    pub fn flag() -> Self {
        Self {
            flag: true,
            ..Self::default()
        }
    }

    /// Set the single-character alias.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Hide the option from help output.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Attach an option action.
    #[must_use]
    pub fn action(mut self, action: OptionAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Whether a raw option key addresses this option, by long name or alias.
    #[must_use]
    pub fn matches(&self, name: &str, key: &str) -> bool {
        if name == key {
            return true;
        }
        let Some(short) = self.short else {
            return false;
        };
        let mut chars = key.chars();
        chars.next() == Some(short) && chars.next().is_none()
    }
}

/// An option entry as declared on one node.
///
/// `Disabled` removes an inherited option from this node's effective set.
#[derive(Debug, Clone)]
pub(crate) enum OptionDecl {
    Enabled(OptionSpec),
    Disabled,
}

impl OptionDecl {
    pub(crate) fn spec(&self) -> Option<&OptionSpec> {
        match self {
            Self::Enabled(spec) => Some(spec),
            Self::Disabled => None,
        }
    }
}

/// Declares one expected positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Key in the parsed argument map, and the `<name>` shown in usage.
    pub name: String,
    /// Whether the argument may be left out.
    pub optional: bool,
    /// One-line description for help output.
    pub help: Option<String>,
}

impl ArgumentSpec {
    /// A required argument.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            help: None,
        }
    }

    /// An optional argument.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::required(name)
        }
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Usage notation: `<name>` or `[<name>]`.
    #[must_use]
    pub fn usage(&self) -> String {
        if self.optional {
            format!("[<{}>]", self.name)
        } else {
            format!("<{}>", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_long_and_short() {
        let spec = OptionSpec::value().short('r');
        assert!(spec.matches("ripeness", "ripeness"));
        assert!(spec.matches("ripeness", "r"));
        assert!(!spec.matches("ripeness", "rr"));
        assert!(!spec.matches("ripeness", "x"));
    }

    #[test]
    fn test_matches_without_short() {
        let spec = OptionSpec::flag();
        assert!(spec.matches("reduced", "reduced"));
        assert!(!spec.matches("reduced", "r"));
    }

    #[test]
    fn test_argument_usage() {
        assert_eq!(ArgumentSpec::required("size").usage(), "<size>");
        assert_eq!(ArgumentSpec::optional("colour").usage(), "[<colour>]");
    }
}
