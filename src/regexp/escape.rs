use std::borrow::Cow;

const META: &[char] = &[
    '.', '+', '*', '?', '=', '^', '!', ':', '$', '{', '}', '(', ')', '[', ']', '|', '/', '\\',
];

/// Escapes regex metacharacters so `value` matches itself literally.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        if META.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// Range and set-operation syntax that only matters inside `[...]`.
const CLASS_META: &[char] = &['-', '&', '~'];

/// Escapes `value` for use between the brackets of a character class.
pub fn escape_class(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        if META.contains(&ch) || CLASS_META.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Character class matching any one of `chars`. Empty input yields `None`
/// since `[]` is not a valid class.
pub fn char_class(chars: &str) -> Option<String> {
    if chars.is_empty() {
        return None;
    }
    Some(format!("[{}]", escape_class(chars)))
}

/// Pins `\d` and `\w` (and their negations outside brackets) to ASCII so
/// custom patterns do not pick up Unicode digits and letters. Other escapes
/// pass through.
pub fn ascii_classes(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains('\\') {
        return Cow::Borrowed(pattern);
    }
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut in_class = false;
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '[' => in_class = true,
            ']' => in_class = false,
            '\\' => {
                match (chars.next(), in_class) {
                    (Some('d'), false) => out.push_str("[0-9]"),
                    (Some('D'), false) => out.push_str("[^0-9]"),
                    (Some('w'), false) => out.push_str("[0-9A-Za-z_]"),
                    (Some('W'), false) => out.push_str("[^0-9A-Za-z_]"),
                    (Some('d'), true) => out.push_str("0-9"),
                    (Some('w'), true) => out.push_str("0-9A-Za-z_"),
                    (Some(other), _) => {
                        out.push('\\');
                        out.push(other);
                    }
                    (None, _) => out.push('\\'),
                }
                continue;
            }
            _ => {}
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_metacharacters_only() {
        assert_eq!(escape_string("/a.b"), "\\/a\\.b");
        assert_eq!(escape_string("(x)|[y]"), "\\(x\\)\\|\\[y\\]");
        assert_eq!(escape_string("plain-text_#"), "plain-text_#");
    }

    #[test]
    fn builds_delimiter_class() {
        assert_eq!(char_class("/#?").as_deref(), Some("[\\/#\\?]"));
        assert_eq!(char_class(""), None);
    }

    #[test]
    fn class_escaping_covers_range_and_set_operators() {
        assert_eq!(escape_class("a-z"), "a\\-z");
        assert_eq!(char_class("/&&").as_deref(), Some("[\\/\\&\\&]"));
        assert_eq!(char_class("~^]").as_deref(), Some("[\\~\\^\\]]"));
        assert_eq!(escape_string("a-z"), "a-z");
    }

    #[test]
    fn shorthand_classes_are_pinned_to_ascii() {
        assert_eq!(ascii_classes("\\d+"), "[0-9]+");
        assert_eq!(ascii_classes("[\\w.]+"), "[0-9A-Za-z_.]+");
        assert_eq!(ascii_classes("[^\\d]\\d"), "[^0-9][0-9]");
        assert_eq!(ascii_classes("\\D\\W"), "[^0-9][^0-9A-Za-z_]");
        assert_eq!(ascii_classes("\\\\d\\s"), "\\\\d\\s");
        assert!(matches!(ascii_classes("[^/]+"), Cow::Borrowed(_)));
    }
}
