/// Argv parsing: tokenizer, error catalog, parser, and the parsed payload.
pub mod catalog;
pub mod parser;
pub mod payload;
pub mod tokenizer;

pub use catalog::{DefaultCatalog, Diagnostic, ErrorCatalog, ErrorKind, ParseError};
pub use parser::Parser;
pub use payload::{OptionValue, ParsedPayload};
pub use tokenizer::{ArgvTokenizer, RawValue, Tokenizer, Tokens};
