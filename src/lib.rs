pub mod errors;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod regexp;
pub mod render;

pub use errors::{PathPatternError, PathPatternResult};
pub use matcher::{MatchResult, ParamValue, Params, PathMatcher, regexp_to_function};
pub use options::{OptionsError, PathOptions, PathOptionsBuilder};
pub use pattern::{
    Key, LexError, LexMode, LexToken, LexTokenKind, Modifier, Name, ParseError, Token, lex, parse,
};
pub use regexp::{PathInput, PathRegex, RegexError, path_to_regexp, tokens_to_regexp};
pub use render::{PathRenderer, RenderError, compile, tokens_to_function};

/// Compiles `input` and wraps it into a matcher in one step.
#[tracing::instrument(level = "trace", skip_all)]
pub fn match_path(
    input: impl Into<PathInput>,
    options: &PathOptions,
) -> PathPatternResult<PathMatcher> {
    let compiled = path_to_regexp(input, options)?;
    Ok(regexp_to_function(compiled, options))
}
