mod adapter;
mod builder;
mod error;
mod escape;

pub use adapter::{PathInput, path_to_regexp, scan_group_keys};
pub use builder::{PathRegex, tokens_to_regexp};
pub use error::{RegexError, RegexResult};
pub use escape::{ascii_classes, char_class, escape_class, escape_string};
