use hashbrown::HashSet;

use super::ast::{Key, Modifier, Name, Token};
use super::error::{ParseError, ParseResult};
use super::lexer::{LexMode, LexToken, LexTokenKind, lex};
use crate::options::PathOptions;
use crate::regexp::escape_class;

const WILDCARD_PATTERN: &str = ".*";

/// Pattern used by keys without an explicit `(pattern)`: one or more
/// characters outside the delimiter set.
pub fn default_pattern(delimiter: &str) -> String {
    format!("[^{}]+?", escape_class(delimiter))
}

/// Parses a path pattern into literal fragments and keys.
#[tracing::instrument(level = "trace", skip(options), fields(pattern=%input))]
pub fn parse(input: &str, options: &PathOptions) -> ParseResult<Vec<Token>> {
    let tokens = lex(input, LexMode::Strict)?;
    let tokens = PatternParser::new(tokens, options).run()?;
    tracing::event!(tracing::Level::TRACE, operation="parse", tokens=tokens.len() as u64);
    Ok(tokens)
}

struct PatternParser<'a> {
    tokens: Vec<LexToken>,
    pos: usize,
    options: &'a PathOptions,
    default_pattern: String,
    result: Vec<Token>,
    path: String,
    next_ordinal: usize,
    names: HashSet<Name>,
}

impl<'a> PatternParser<'a> {
    fn new(tokens: Vec<LexToken>, options: &'a PathOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
            default_pattern: default_pattern(&options.delimiter),
            result: Vec::new(),
            path: String::new(),
            next_ordinal: 0,
            names: HashSet::new(),
        }
    }

    fn run(mut self) -> ParseResult<Vec<Token>> {
        loop {
            let ch = self.try_consume(LexTokenKind::Char);
            let name = self.try_consume(LexTokenKind::Name);
            let pattern = self.try_consume_pattern(name.is_none());

            if name.is_some() || pattern.is_some() {
                self.push_bare_key(ch, name, pattern)?;
                continue;
            }

            let literal = ch.or_else(|| self.try_consume(LexTokenKind::EscapedChar));
            if let Some(token) = literal {
                self.path.push_str(&token.value);
                continue;
            }

            if self.try_consume(LexTokenKind::Open).is_some() {
                self.bracket_group()?;
                continue;
            }

            self.flush_path();
            self.must_consume(LexTokenKind::End)?;
            break;
        }

        Ok(self.result)
    }

    /// `:name`, `(pattern)` or `*`, optionally preceded by a prefix character.
    fn push_bare_key(
        &mut self,
        ch: Option<LexToken>,
        name: Option<LexToken>,
        pattern: Option<LexToken>,
    ) -> ParseResult<()> {
        let mut prefix = ch.map(|token| token.value).unwrap_or_default();
        if !self.options.prefixes.contains(prefix.as_str()) {
            self.path.push_str(&prefix);
            prefix.clear();
        }

        self.flush_path();

        let name = match name {
            Some(token) => self.claim(Name::Explicit(token.value), token.index)?,
            None => {
                let index = pattern.as_ref().map(|token| token.index).unwrap_or_default();
                self.claim_ordinal(index)?
            }
        };
        let pattern = pattern
            .map(|token| token.value)
            .unwrap_or_else(|| self.default_pattern.clone());
        let modifier = self.try_consume_modifier();

        self.result.push(Token::Key(Key {
            name,
            prefix: (self.options.encode_part)(&prefix),
            suffix: String::new(),
            pattern,
            modifier,
        }));
        Ok(())
    }

    /// Everything after `{` up to and including `}` and a trailing modifier.
    fn bracket_group(&mut self) -> ParseResult<()> {
        let prefix = self.consume_text();
        let name = self.try_consume(LexTokenKind::Name);
        let pattern = self.try_consume_pattern(name.is_none());
        let suffix = self.consume_text();
        self.must_consume(LexTokenKind::Close)?;
        let modifier = self.try_consume_modifier();

        if name.is_none() && pattern.is_none() {
            if modifier == Modifier::None {
                self.path.push_str(&prefix);
                return Ok(());
            }
            if prefix.is_empty() {
                return Ok(());
            }
        }

        self.flush_path();

        let key_name = match (&name, &pattern) {
            (Some(token), _) => self.claim(Name::Explicit(token.value.clone()), token.index)?,
            (None, Some(token)) => self.claim_ordinal(token.index)?,
            // Decoration only: `{text}?` keeps its text optional but captures nothing.
            (None, None) => Name::Explicit(String::new()),
        };
        let key_pattern = match (name, pattern) {
            (_, Some(token)) => token.value,
            (Some(_), None) => self.default_pattern.clone(),
            (None, None) => String::new(),
        };

        self.result.push(Token::Key(Key {
            name: key_name,
            prefix: (self.options.encode_part)(&prefix),
            suffix: (self.options.encode_part)(&suffix),
            pattern: key_pattern,
            modifier,
        }));
        Ok(())
    }

    fn claim(&mut self, name: Name, index: usize) -> ParseResult<Name> {
        if !self.names.insert(name.clone()) {
            return Err(ParseError::DuplicateName { name, index });
        }
        Ok(name)
    }

    fn claim_ordinal(&mut self, index: usize) -> ParseResult<Name> {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.claim(Name::Ordinal(ordinal), index)
    }

    fn flush_path(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let path = std::mem::take(&mut self.path);
        self.result
            .push(Token::Literal((self.options.encode_part)(&path)));
    }

    fn peek_kind(&self) -> LexTokenKind {
        self.tokens
            .get(self.pos)
            .map(|token| token.kind)
            .unwrap_or(LexTokenKind::End)
    }

    fn try_consume(&mut self, kind: LexTokenKind) -> Option<LexToken> {
        let token = self.tokens.get(self.pos)?;
        if token.kind != kind {
            return None;
        }
        self.pos += 1;
        Some(token.clone())
    }

    /// A `(pattern)`, or a bare `*` standing in for `.*` when no name precedes it.
    fn try_consume_pattern(&mut self, allow_wildcard: bool) -> Option<LexToken> {
        if let Some(token) = self.try_consume(LexTokenKind::Pattern) {
            return Some(token);
        }
        if !allow_wildcard {
            return None;
        }
        self.try_consume(LexTokenKind::Asterisk).map(|token| LexToken {
            value: WILDCARD_PATTERN.to_string(),
            ..token
        })
    }

    fn try_consume_modifier(&mut self) -> Modifier {
        self.try_consume(LexTokenKind::Modifier)
            .or_else(|| self.try_consume(LexTokenKind::Asterisk))
            .and_then(|token| Modifier::from_symbol(&token.value))
            .unwrap_or_default()
    }

    fn must_consume(&mut self, kind: LexTokenKind) -> ParseResult<LexToken> {
        if let Some(token) = self.try_consume(kind) {
            return Ok(token);
        }
        let index = self
            .tokens
            .get(self.pos)
            .map(|token| token.index)
            .unwrap_or_default();
        Err(ParseError::UnexpectedToken {
            found: self.peek_kind(),
            index,
            expected: kind,
        })
    }

    fn consume_text(&mut self) -> String {
        let mut text = String::new();
        loop {
            let token = self
                .try_consume(LexTokenKind::Char)
                .or_else(|| self.try_consume(LexTokenKind::EscapedChar));
            match token {
                Some(token) => text.push_str(&token.value),
                None => return text,
            }
        }
    }
}
