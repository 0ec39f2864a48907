/// Message rendering: help, version, errors, and terminal colors.
pub mod formatter;
pub mod lines;
pub mod style;

pub use formatter::{DefaultFormatter, MessageFormatter};
pub use lines::LineMapper;
pub use style::{ColorMode, set_color_mode, strip};
