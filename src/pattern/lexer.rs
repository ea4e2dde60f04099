use std::fmt;

use super::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexTokenKind {
    Open,
    Close,
    Pattern,
    Name,
    Char,
    EscapedChar,
    Modifier,
    Asterisk,
    InvalidChar,
    End,
}

impl LexTokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::Pattern => "PATTERN",
            Self::Name => "NAME",
            Self::Char => "CHAR",
            Self::EscapedChar => "ESCAPED_CHAR",
            Self::Modifier => "MODIFIER",
            Self::Asterisk => "ASTERISK",
            Self::InvalidChar => "INVALID_CHAR",
            Self::End => "END",
        }
    }
}

impl fmt::Display for LexTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexToken {
    pub kind: LexTokenKind,
    /// Character offset into the source pattern.
    pub index: usize,
    pub value: String,
}

impl LexToken {
    fn new(kind: LexTokenKind, index: usize, value: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            value: value.into(),
        }
    }
}

/// How the lexer reacts to malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Stop at the first error.
    #[default]
    Strict,
    /// Emit an `InvalidChar` token for the offending character and keep going.
    Lenient,
}

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || unicode_ident::is_xid_start(ch)
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '$' || ch == ZWNJ || ch == ZWJ || unicode_ident::is_xid_continue(ch)
}

struct Lexer {
    chars: Vec<char>,
    index: usize,
    mode: LexMode,
    tokens: Vec<LexToken>,
}

impl Lexer {
    fn new(input: &str, mode: LexMode) -> Self {
        let chars: Vec<char> = input.chars().collect();
        Self {
            tokens: Vec::with_capacity(chars.len() + 1),
            chars,
            index: 0,
            mode,
        }
    }

    fn peek_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    fn push(&mut self, kind: LexTokenKind, index: usize, value: impl Into<String>) {
        self.tokens.push(LexToken::new(kind, index, value));
    }

    fn push_single(&mut self, kind: LexTokenKind, ch: char) {
        self.push(kind, self.index, ch);
        self.index += 1;
    }

    fn fail(&mut self, err: LexError) -> Result<(), LexError> {
        match self.mode {
            LexMode::Strict => Err(err),
            LexMode::Lenient => {
                let ch = self.chars[self.index];
                self.push_single(LexTokenKind::InvalidChar, ch);
                Ok(())
            }
        }
    }

    fn run(mut self) -> Result<Vec<LexToken>, LexError> {
        while let Some(ch) = self.peek_at(self.index) {
            match ch {
                '*' => self.push_single(LexTokenKind::Asterisk, ch),
                '+' | '?' => self.push_single(LexTokenKind::Modifier, ch),
                '\\' => self.escaped_char()?,
                '{' => self.push_single(LexTokenKind::Open, ch),
                '}' => self.push_single(LexTokenKind::Close, ch),
                ':' => self.name()?,
                '(' => self.pattern()?,
                _ => self.push_single(LexTokenKind::Char, ch),
            }
        }

        let end = self.index;
        self.push(LexTokenKind::End, end, "");
        Ok(self.tokens)
    }

    fn escaped_char(&mut self) -> Result<(), LexError> {
        let start = self.index;
        match self.peek_at(start + 1) {
            Some(escaped) => {
                self.push(LexTokenKind::EscapedChar, start, escaped);
                self.index += 2;
                Ok(())
            }
            None => self.fail(LexError::UnexpectedEndAfterEscape { index: start }),
        }
    }

    fn name(&mut self) -> Result<(), LexError> {
        let start = self.index;
        let mut name = String::new();
        let mut j = start + 1;

        while let Some(ch) = self.peek_at(j) {
            let accepted = if j == start + 1 {
                is_identifier_start(ch)
            } else {
                is_identifier_continue(ch)
            };
            if !accepted {
                break;
            }
            name.push(ch);
            j += 1;
        }

        if name.is_empty() {
            return self.fail(LexError::MissingParameterName { index: start });
        }

        self.push(LexTokenKind::Name, start, name);
        self.index = j;
        Ok(())
    }

    fn pattern(&mut self) -> Result<(), LexError> {
        let start = self.index;
        let mut depth = 1usize;
        let mut pattern = String::new();
        let mut j = start + 1;

        if self.peek_at(j) == Some('?') {
            return self.fail(LexError::PatternStartsWithQuestionMark { index: j });
        }

        while let Some(ch) = self.peek_at(j) {
            if !ch.is_ascii() {
                return self.fail(LexError::NonAsciiInPattern {
                    character: ch,
                    index: j,
                });
            }

            if ch == '\\' {
                let Some(escaped) = self.peek_at(j + 1) else {
                    // Nothing left to escape; depth is still open.
                    break;
                };
                pattern.push(ch);
                pattern.push(escaped);
                j += 2;
                continue;
            }

            if ch == ')' {
                depth -= 1;
                if depth == 0 {
                    j += 1;
                    break;
                }
            } else if ch == '(' {
                depth += 1;
                if self.peek_at(j + 1) != Some('?') {
                    return self.fail(LexError::CapturingGroupNotAllowed { index: j });
                }
            }

            pattern.push(ch);
            j += 1;
        }

        if depth > 0 {
            return self.fail(LexError::UnbalancedPattern { index: start });
        }

        if pattern.is_empty() {
            return self.fail(LexError::MissingPattern { index: start });
        }

        self.push(LexTokenKind::Pattern, start, pattern);
        self.index = j;
        Ok(())
    }
}

/// Splits a pattern string into lexical tokens. The result always ends with a
/// single `End` token positioned at the input length.
#[tracing::instrument(level = "trace", skip_all, fields(input=%input, mode=?mode))]
pub fn lex(input: &str, mode: LexMode) -> Result<Vec<LexToken>, LexError> {
    Lexer::new(input, mode).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[LexToken]) -> Vec<LexTokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn classifies_structural_symbols() {
        let tokens = lex("{/:id(\\d+)}?*", LexMode::Strict).unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                LexTokenKind::Open,
                LexTokenKind::Char,
                LexTokenKind::Name,
                LexTokenKind::Pattern,
                LexTokenKind::Close,
                LexTokenKind::Modifier,
                LexTokenKind::Asterisk,
                LexTokenKind::End,
            ]
        );
        assert_eq!(tokens[2].value, "id");
        assert_eq!(tokens[3].value, "\\d+");
        assert_eq!(tokens[3].index, 5);
        assert_eq!(tokens[7].index, 13);
    }

    #[test]
    fn escaped_char_records_backslash_offset() {
        let tokens = lex("a\\:b", LexMode::Strict).unwrap();
        assert_eq!(tokens[1].kind, LexTokenKind::EscapedChar);
        assert_eq!(tokens[1].index, 1);
        assert_eq!(tokens[1].value, ":");
        assert_eq!(tokens[2].index, 3);
    }

    #[test]
    fn name_is_greedy_and_accepts_unicode() {
        let tokens = lex(":café_1$-x", LexMode::Strict).unwrap();
        assert_eq!(tokens[0].value, "café_1$");
        assert_eq!(tokens[1].kind, LexTokenKind::Char);
        assert_eq!(tokens[1].index, 8);
    }

    #[test]
    fn name_keeps_combining_marks_and_connectors() {
        let tokens = lex(":cafe\u{0301}", LexMode::Strict).unwrap();
        assert_eq!(kinds(&tokens), vec![LexTokenKind::Name, LexTokenKind::End]);
        assert_eq!(tokens[0].value, "cafe\u{0301}");

        let tokens = lex(":a\u{203F}b/", LexMode::Strict).unwrap();
        assert_eq!(tokens[0].value, "a\u{203F}b");
        assert_eq!(tokens[1].kind, LexTokenKind::Char);

        let tokens = lex(":a\u{200D}b", LexMode::Strict).unwrap();
        assert_eq!(tokens[0].value, "a\u{200D}b");
    }

    #[test]
    fn name_cannot_start_with_combining_mark() {
        let err = lex(":\u{0301}a", LexMode::Strict).unwrap_err();
        assert_eq!(err, LexError::MissingParameterName { index: 0 });
    }

    #[test]
    fn name_cannot_start_with_digit() {
        let err = lex("/:1id", LexMode::Strict).unwrap_err();
        assert_eq!(err, LexError::MissingParameterName { index: 1 });
    }

    #[test]
    fn pattern_allows_non_capturing_nested_groups() {
        let tokens = lex("((?:a|b)+)", LexMode::Strict).unwrap();
        assert_eq!(tokens[0].kind, LexTokenKind::Pattern);
        assert_eq!(tokens[0].value, "(?:a|b)+");
    }

    #[test]
    fn pattern_rejects_capturing_nested_group() {
        let err = lex("(a(b))", LexMode::Strict).unwrap_err();
        assert_eq!(err, LexError::CapturingGroupNotAllowed { index: 2 });
    }

    #[test]
    fn pattern_rejects_leading_question_mark() {
        let err = lex("(?foo)", LexMode::Strict).unwrap_err();
        assert_eq!(err, LexError::PatternStartsWithQuestionMark { index: 1 });
        assert_eq!(err.to_string(), "Pattern cannot start with \"?\" at 1");
    }

    #[test]
    fn pattern_rejects_non_ascii() {
        let err = lex("(é)", LexMode::Strict).unwrap_err();
        assert_eq!(
            err,
            LexError::NonAsciiInPattern {
                character: 'é',
                index: 1
            }
        );
    }

    #[test]
    fn pattern_reports_unbalanced_and_empty() {
        assert_eq!(
            lex("/(abc", LexMode::Strict).unwrap_err(),
            LexError::UnbalancedPattern { index: 1 }
        );
        assert_eq!(
            lex("/()", LexMode::Strict).unwrap_err(),
            LexError::MissingPattern { index: 1 }
        );
    }

    #[test]
    fn pattern_escape_is_copied_verbatim() {
        let tokens = lex("(\\))", LexMode::Strict).unwrap();
        assert_eq!(tokens[0].value, "\\)");
    }

    #[test]
    fn trailing_backslash_is_an_error() {
        assert_eq!(
            lex("/a\\", LexMode::Strict).unwrap_err(),
            LexError::UnexpectedEndAfterEscape { index: 2 }
        );
    }

    #[test]
    fn lenient_mode_emits_invalid_char_and_continues() {
        let tokens = lex("/:/(?x)", LexMode::Lenient).unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                LexTokenKind::Char,
                LexTokenKind::InvalidChar,
                LexTokenKind::Char,
                LexTokenKind::InvalidChar,
                LexTokenKind::Modifier,
                LexTokenKind::Char,
                LexTokenKind::Char,
                LexTokenKind::End,
            ]
        );
        assert_eq!(tokens[1].value, ":");
        assert_eq!(tokens[3].value, "(");
    }

    #[test]
    fn empty_input_yields_only_end() {
        let tokens = lex("", LexMode::Strict).unwrap();
        assert_eq!(tokens, vec![LexToken::new(LexTokenKind::End, 0, "")]);
    }
}
