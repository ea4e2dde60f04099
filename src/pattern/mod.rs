mod ast;
mod error;
mod lexer;
mod parser;

pub(crate) use ast::NameRef;
pub use ast::{Key, Modifier, Name, Token};
pub use error::{LexError, ParseError, ParseResult};
pub use lexer::{LexMode, LexToken, LexTokenKind, lex};
pub use parser::{default_pattern, parse};
