/// Command tree: declarations, inheritance, paths, suggestions.
pub mod errors;
pub mod node;
pub mod path;
pub mod spec;
pub mod suggest;

pub use errors::TreeError;
pub use node::{CommandId, CommandMut, CommandRef, CommandTree};
pub use path::{PATH_SEP, join_path, split_path};
pub use spec::{ArgumentSpec, OptionAction, OptionSpec};
pub use suggest::suggest;
