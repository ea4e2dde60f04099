mod compiler;
mod error;

pub use compiler::{PathRenderer, compile, tokens_to_function};
pub use error::{RenderError, RenderResult};
