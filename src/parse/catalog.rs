/// Structured parse errors and the catalog that renders them.
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Broad category of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The command path did not resolve.
    Command,
    /// Positional argument validation failed.
    Argument,
    /// Option validation failed.
    Option,
}

impl ErrorKind {
    /// Lowercase tag (`command`, `argument`, `option`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Argument => "argument",
            Self::Option => "option",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation problem found while parsing.
///
/// The `Display` output is the default English message; substitute an
/// [`ErrorCatalog`] to change it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A segment of the command path has no matching subcommand.
    #[error("Command \"{path}\" not found")]
    CommandNotFound {
        /// The full command path as typed.
        path: String,
        /// The first segment that failed to resolve.
        unresolved: String,
    },

    /// More positionals than declared arguments.
    #[error("Too many arguments, expected {expected} got {actual}")]
    TooManyArguments {
        /// Declared argument count.
        expected: usize,
        /// Supplied positional count.
        actual: usize,
    },

    /// A required argument was not supplied.
    #[error("Argument <{name}> is required")]
    MissingArgument {
        /// The argument's declared name.
        name: String,
    },

    /// An option key matches no effective option.
    #[error("Option {}{name} not allowed", dashes(.name))]
    OptionNotAllowed {
        /// The key as typed, dashes stripped.
        name: String,
    },

    /// A value option was given without `=value`.
    #[error("Option --{name} should have a value")]
    OptionNeedsValue {
        /// The option's declared name.
        name: String,
    },

    /// A flag option was given `=value`.
    #[error("Option --{name} is a flag and should not have a value")]
    FlagWithValue {
        /// The option's declared name.
        name: String,
    },
}

fn dashes(name: &str) -> &'static str {
    if name.chars().count() == 1 { "-" } else { "--" }
}

impl ParseError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CommandNotFound { .. } => ErrorKind::Command,
            Self::TooManyArguments { .. } | Self::MissingArgument { .. } => ErrorKind::Argument,
            Self::OptionNotAllowed { .. }
            | Self::OptionNeedsValue { .. }
            | Self::FlagWithValue { .. } => ErrorKind::Option,
        }
    }

    /// Machine-readable tag within the category.
    #[must_use]
    pub fn subkind(&self) -> &'static str {
        match self {
            Self::CommandNotFound { .. } => "notFound",
            Self::TooManyArguments { .. } => "tooMany",
            Self::MissingArgument { .. } => "missingRequired",
            Self::OptionNotAllowed { .. } => "notAllowed",
            Self::OptionNeedsValue { .. } => "shouldHaveValue",
            Self::FlagWithValue { .. } => "shouldNotHaveValue",
        }
    }
}

/// Maps each [`ParseError`] variant to user-facing text.
///
/// Every method has a default returning the built-in English message, so an
/// implementation only overrides the templates it wants to change.
pub trait ErrorCatalog {
    /// `command.notFound`
    fn command_not_found(&self, path: &str) -> String {
        ParseError::CommandNotFound {
            path: path.to_owned(),
            unresolved: String::new(),
        }
        .to_string()
    }

    /// `argument.tooMany`
    fn too_many_arguments(&self, expected: usize, actual: usize) -> String {
        ParseError::TooManyArguments { expected, actual }.to_string()
    }

    /// `argument.missingRequired`
    fn missing_argument(&self, name: &str) -> String {
        ParseError::MissingArgument {
            name: name.to_owned(),
        }
        .to_string()
    }

    /// `option.notAllowed`
    fn option_not_allowed(&self, name: &str) -> String {
        ParseError::OptionNotAllowed {
            name: name.to_owned(),
        }
        .to_string()
    }

    /// `option.shouldHaveValue`
    fn option_needs_value(&self, name: &str) -> String {
        ParseError::OptionNeedsValue {
            name: name.to_owned(),
        }
        .to_string()
    }

    /// `option.shouldNotHaveValue`
    fn flag_with_value(&self, name: &str) -> String {
        ParseError::FlagWithValue {
            name: name.to_owned(),
        }
        .to_string()
    }

    /// Render any error through the template for its variant.
    fn render(&self, error: &ParseError) -> String {
        match error {
            ParseError::CommandNotFound { path, .. } => self.command_not_found(path),
            ParseError::TooManyArguments { expected, actual } => {
                self.too_many_arguments(*expected, *actual)
            }
            ParseError::MissingArgument { name } => self.missing_argument(name),
            ParseError::OptionNotAllowed { name } => self.option_not_allowed(name),
            ParseError::OptionNeedsValue { name } => self.option_needs_value(name),
            ParseError::FlagWithValue { name } => self.flag_with_value(name),
        }
    }
}

/// The built-in English catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl ErrorCatalog for DefaultCatalog {}

/// A parse error paired with its rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The structured error.
    pub error: ParseError,
    /// Catalog output for `error`.
    pub message: String,
}

impl Diagnostic {
    /// Render `error` through `catalog`.
    #[must_use]
    pub fn new(error: ParseError, catalog: &dyn ErrorCatalog) -> Self {
        let message = catalog.render(&error);
        Self { error, message }
    }

    /// Category of the underlying error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates() {
        let catalog = DefaultCatalog;
        assert_eq!(
            catalog.too_many_arguments(0, 2),
            "Too many arguments, expected 0 got 2"
        );
        assert_eq!(catalog.missing_argument("banana"), "Argument <banana> is required");
        assert_eq!(catalog.option_not_allowed("cactus"), "Option --cactus not allowed");
        assert_eq!(catalog.option_not_allowed("c"), "Option -c not allowed");
        assert_eq!(
            catalog.option_needs_value("ripeness"),
            "Option --ripeness should have a value"
        );
        assert_eq!(
            catalog.flag_with_value("reduced"),
            "Option --reduced is a flag and should not have a value"
        );
        assert_eq!(
            catalog.command_not_found("banana:plantain"),
            "Command \"banana:plantain\" not found"
        );
    }

    #[test]
    fn test_render_uses_overridden_template() {
        struct Terse;
        impl ErrorCatalog for Terse {
            fn too_many_arguments(&self, expected: usize, actual: usize) -> String {
                format!("<tooMany {expected} {actual}>")
            }
        }

        let too_many = ParseError::TooManyArguments {
            expected: 3,
            actual: 4,
        };
        let not_allowed = ParseError::OptionNotAllowed {
            name: "apple".to_owned(),
        };

        assert_eq!(Terse.render(&too_many), "<tooMany 3 4>");
        assert_eq!(Terse.render(&not_allowed), "Option --apple not allowed");
    }

    #[test]
    fn test_kinds_and_subkinds() {
        let error = ParseError::MissingArgument {
            name: "type".to_owned(),
        };
        assert_eq!(error.kind(), ErrorKind::Argument);
        assert_eq!(error.subkind(), "missingRequired");

        let diagnostic = Diagnostic::new(error, &DefaultCatalog);
        assert_eq!(diagnostic.kind().to_string(), "argument");
        assert_eq!(diagnostic.message, "Argument <type> is required");
    }
}
