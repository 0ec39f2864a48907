/// Raw argv splitting into positionals and `key[=value]` option tokens.
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// The value half of a raw option token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// `--name` with no `=`.
    Present,
    /// `--name=text`; the text may be empty.
    Text(String),
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present => serializer.serialize_bool(true),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// Tokenized process arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokens {
    /// Non-option tokens, in order.
    #[serde(rename = "args")]
    pub positionals: Vec<String>,
    /// Option tokens keyed by their name with dashes stripped.
    pub options: IndexMap<String, RawValue>,
}

/// Splits raw process arguments into [`Tokens`].
pub trait Tokenizer {
    /// Tokenize a full argv, program name included.
    fn tokenize(&self, argv: &[String]) -> Tokens;
}

/// The default tokenizer.
///
/// - The first `skip` entries (the program name) are dropped.
/// - A token starting with `-` is an option: leading dashes are stripped and
///   the rest is split on the first `=`.
/// - Everything else is a positional.
/// - A repeated option key overwrites the earlier value in place.
#[derive(Debug, Clone, Copy)]
pub struct ArgvTokenizer {
    skip: usize,
}

impl ArgvTokenizer {
    /// Tokenizer skipping the program name only.
    #[must_use]
    pub fn new() -> Self {
        Self { skip: 1 }
    }

    /// Tokenizer skipping `skip` leading entries (e.g. 2 for `interpreter script`).
    #[must_use]
    pub fn skipping(skip: usize) -> Self {
        Self { skip }
    }
}

impl Default for ArgvTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for ArgvTokenizer {
    fn tokenize(&self, argv: &[String]) -> Tokens {
        let mut tokens = Tokens::default();
        for arg in argv.iter().skip(self.skip) {
            if arg.starts_with('-') {
                let stripped = arg.trim_start_matches('-');
                let (key, value) = match stripped.split_once('=') {
                    Some((key, value)) => (key, RawValue::Text(value.to_owned())),
                    None => (stripped, RawValue::Present),
                };
                tokens.options.insert(key.to_owned(), value);
            } else {
                tokens.positionals.push(arg.clone());
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_owned()).collect()
    }

    fn tokenize(args: &[&str]) -> Tokens {
        ArgvTokenizer::new().tokenize(&argv(args))
    }

    #[test]
    fn test_positionals() {
        let tokens = tokenize(&["fruit", "foo", "bar"]);
        assert_eq!(tokens.positionals, vec!["foo", "bar"]);
        assert!(tokens.options.is_empty());
    }

    #[test]
    fn test_long_options() {
        let tokens = tokenize(&["fruit", "--foo", "--bar=zim"]);
        assert!(tokens.positionals.is_empty());
        assert_eq!(tokens.options["foo"], RawValue::Present);
        assert_eq!(tokens.options["bar"], RawValue::Text("zim".to_owned()));
    }

    #[test]
    fn test_short_options() {
        let tokens = tokenize(&["fruit", "-f", "-b=zim"]);
        assert_eq!(tokens.options["f"], RawValue::Present);
        assert_eq!(tokens.options["b"], RawValue::Text("zim".to_owned()));
    }

    #[test]
    fn test_mixed_order() {
        let tokens = tokenize(&["fruit", "--foo", "bar", "-z=gir", "grue"]);
        assert_eq!(tokens.positionals, vec!["bar", "grue"]);
        assert_eq!(
            tokens.options.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["foo", "z"]
        );
    }

    #[test]
    fn test_split_on_first_equals_only() {
        let tokens = tokenize(&["fruit", "--expr=a=b", "--empty="]);
        assert_eq!(tokens.options["expr"], RawValue::Text("a=b".to_owned()));
        assert_eq!(tokens.options["empty"], RawValue::Text(String::new()));
    }

    #[test]
    fn test_skip_count() {
        let tokens = ArgvTokenizer::skipping(2).tokenize(&argv(&["node", "fruit.js", "apple"]));
        assert_eq!(tokens.positionals, vec!["apple"]);
    }

    #[test]
    fn test_raw_value_serializes_like_argv() {
        let tokens = tokenize(&["fruit", "x", "--a", "--b=c"]);
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "args": ["x"], "options": { "a": true, "b": "c" } })
        );
    }
}
