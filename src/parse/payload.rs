/// The parser's output: resolved command, argument and option maps, errors.
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::{
    catalog::{Diagnostic, ErrorKind},
    tokenizer::{RawValue, Tokens},
};
use crate::tree::CommandRef;

/// A parsed option value.
///
/// A declared option starts at `Flag(false)` (flags) or `Value(None)` (value
/// options); supplied tokens replace that with their own shape, which is then
/// checked against the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Boolean-valued.
    Flag(bool),
    /// String-valued; `None` when absent.
    Value(Option<String>),
}

impl OptionValue {
    /// Whether the value should trigger an option action.
    ///
    /// `Flag(true)` and non-empty strings are truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(on) => *on,
            Self::Value(value) => value.as_deref().is_some_and(|v| !v.is_empty()),
        }
    }

    /// The string value, if this is a present value option.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => value.as_deref(),
            Self::Flag(_) => None,
        }
    }

    /// The boolean, if this is a flag.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(on) => Some(*on),
            Self::Value(_) => None,
        }
    }
}

impl From<RawValue> for OptionValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Present => Self::Flag(true),
            RawValue::Text(text) => Self::Value(Some(text)),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag(on) => serializer.serialize_bool(*on),
            Self::Value(Some(text)) => serializer.serialize_str(text),
            Self::Value(None) => serializer.serialize_none(),
        }
    }
}

/// Everything the parser learned about one invocation.
///
/// Produced even when `errors` is non-empty; parsing itself never fails.
#[derive(Debug, Clone)]
pub struct ParsedPayload<'t> {
    /// The deepest command the path resolved to.
    pub command: CommandRef<'t>,
    /// Declared argument name to supplied value.
    pub args: IndexMap<String, Option<String>>,
    /// Effective option name (or unknown raw key) to value.
    pub options: IndexMap<String, OptionValue>,
    /// Command errors, then argument errors, then option errors.
    pub errors: Vec<Diagnostic>,
    /// Tokenizer output, untouched.
    pub raw: Tokens,
}

impl ParsedPayload<'_> {
    /// No validation errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the command path failed to resolve.
    #[must_use]
    pub fn has_command_error(&self) -> bool {
        self.errors.iter().any(|d| d.kind() == ErrorKind::Command)
    }

    /// Value of a declared argument.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Option::as_deref)
    }

    /// Parsed value of an option.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// `true` only if `name` parsed as `Flag(true)`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.options.get(name), Some(OptionValue::Flag(true)))
    }
}
