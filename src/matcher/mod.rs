mod compiler;
mod params;

pub use compiler::{MatchResult, PathMatcher, regexp_to_function};
pub use params::{ParamValue, Params};
