use fancy_regex::Regex;
use std::fmt;

use super::error::{RenderError, RenderResult};
use crate::errors::PathPatternResult;
use crate::matcher::{ParamValue, Params};
use crate::options::{PathOptions, ValueEncoder};
use crate::pattern::{Key, Token, parse};
use crate::regexp::{RegexError, ascii_classes};

/// Renders concrete paths from parameter values.
#[derive(Clone)]
pub struct PathRenderer {
    tokens: Vec<Token>,
    /// One slot per token; `Some` only for keys when validation is enabled.
    validators: Vec<Option<Regex>>,
    encode: ValueEncoder,
}

impl fmt::Debug for PathRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRenderer")
            .field("tokens", &self.tokens)
            .field("validate", &self.validators.iter().any(Option::is_some))
            .finish_non_exhaustive()
    }
}

fn key_validator(key: &Key, sensitive: bool) -> Result<Regex, RegexError> {
    let flags = if sensitive { "" } else { "(?i)" };
    let source = format!("{flags}^(?:{})$", ascii_classes(&key.pattern));
    Regex::new(&source).map_err(|err| RegexError::build(source, err))
}

impl PathRenderer {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Builds the path, or fails on the first parameter that cannot be
    /// rendered. Nothing is returned on failure.
    pub fn render(&self, params: &Params) -> RenderResult<String> {
        let mut path = String::new();

        for (token, validator) in self.tokens.iter().zip(&self.validators) {
            match token {
                Token::Literal(value) => path.push_str(value),
                Token::Key(key) => {
                    let value = params.get_name(&key.name);
                    self.render_key(&mut path, key, validator.as_ref(), value)
                        .inspect_err(|err| {
                            tracing::event!(tracing::Level::DEBUG, operation="render", name=%key.name, error=%err);
                        })?;
                }
            }
        }

        Ok(path)
    }

    fn render_key(
        &self,
        path: &mut String,
        key: &Key,
        validator: Option<&Regex>,
        value: Option<&ParamValue>,
    ) -> RenderResult<()> {
        let optional = key.modifier.is_optional();
        let repeat = key.modifier.is_repeating();

        match value {
            Some(ParamValue::Repeated(values)) => {
                if !repeat {
                    return Err(RenderError::UnexpectedRepeat {
                        name: key.name.clone(),
                    });
                }
                if values.is_empty() {
                    if optional {
                        return Ok(());
                    }
                    return Err(RenderError::EmptyRepeat {
                        name: key.name.clone(),
                    });
                }
                for value in values {
                    let segment = (self.encode)(value, key);
                    if !passes(validator, &segment) {
                        return Err(RenderError::RepeatedPatternMismatch {
                            name: key.name.clone(),
                            pattern: key.pattern.clone(),
                            value: segment,
                        });
                    }
                    push_segment(path, key, &segment);
                }
                Ok(())
            }
            Some(ParamValue::Single(value)) => {
                let segment = (self.encode)(value, key);
                if !passes(validator, &segment) {
                    return Err(RenderError::PatternMismatch {
                        name: key.name.clone(),
                        pattern: key.pattern.clone(),
                        value: segment,
                    });
                }
                push_segment(path, key, &segment);
                Ok(())
            }
            None if optional => Ok(()),
            None => Err(RenderError::MissingValue {
                name: key.name.clone(),
                expected: if repeat { "an array" } else { "a string" },
            }),
        }
    }
}

fn passes(validator: Option<&Regex>, segment: &str) -> bool {
    validator.is_none_or(|re| re.is_match(segment).unwrap_or(false))
}

fn push_segment(path: &mut String, key: &Key, segment: &str) {
    path.push_str(&key.prefix);
    path.push_str(segment);
    path.push_str(&key.suffix);
}

/// Prepares a renderer for `tokens`, compiling per-key validators up front.
#[tracing::instrument(level = "trace", skip_all, fields(tokens=tokens.len() as u64, validate=options.validate))]
pub fn tokens_to_function(tokens: &[Token], options: &PathOptions) -> PathPatternResult<PathRenderer> {
    let validators = if options.validate {
        tokens
            .iter()
            .map(|token| {
                token
                    .as_key()
                    .map(|key| key_validator(key, options.sensitive))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![None; tokens.len()]
    };

    Ok(PathRenderer {
        tokens: tokens.to_vec(),
        validators,
        encode: options.encode_value.clone(),
    })
}

/// Parses `pattern` and prepares a renderer for it.
pub fn compile(pattern: &str, options: &PathOptions) -> PathPatternResult<PathRenderer> {
    let tokens = parse(pattern, options)?;
    tokens_to_function(&tokens, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Name;

    fn renderer(pattern: &str) -> PathRenderer {
        compile(pattern, &PathOptions::default()).expect("pattern should compile")
    }

    #[test]
    fn renders_scalars_and_numbers() {
        let to_path = renderer("/user/:id/:tab");
        let params = Params::new().with("id", 123u64).with("tab", "posts");
        assert_eq!(to_path.render(&params).unwrap(), "/user/123/posts");
    }

    #[test]
    fn renders_repeated_values_with_prefix_per_element() {
        let to_path = renderer("/x/:a@:b/:c*");
        let params = Params::new()
            .with("a", "y")
            .with("b", "v1.0.0")
            .with("c", vec!["z", "example.ts"]);
        assert_eq!(to_path.render(&params).unwrap(), "/x/y@v1.0.0/z/example.ts");
    }

    #[test]
    fn optional_keys_are_skipped_when_absent() {
        let to_path = renderer("/a/:b?/:c*");
        assert_eq!(to_path.render(&Params::new()).unwrap(), "/a");
        let params = Params::new().with("c", Vec::<String>::new());
        assert_eq!(to_path.render(&params).unwrap(), "/a");
    }

    #[test]
    fn missing_required_value_names_expected_shape() {
        let err = renderer("/:id").render(&Params::new()).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingValue {
                name: Name::from("id"),
                expected: "a string"
            }
        );
        let err = renderer("/:ids+").render(&Params::new()).unwrap_err();
        assert_eq!(err.to_string(), "Expected \"ids\" to be an array");
    }

    #[test]
    fn array_for_scalar_key_is_rejected() {
        let params = Params::new().with("id", vec!["1", "2"]);
        let err = renderer("/:id").render(&params).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnexpectedRepeat {
                name: Name::from("id")
            }
        );
    }

    #[test]
    fn empty_array_for_one_or_more_is_rejected() {
        let params = Params::new().with("ids", Vec::<String>::new());
        let err = renderer("/:ids+").render(&params).unwrap_err();
        assert_eq!(err.to_string(), "Expected \"ids\" to not be empty");
    }

    #[test]
    fn validation_checks_each_value() {
        let to_path = renderer("/:id(\\d+)");
        let err = to_path.render(&Params::new().with("id", "abc")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected \"id\" to match \"\\d+\", but got \"abc\""
        );

        let to_path = renderer("/:ids(\\d+)+");
        let err = to_path
            .render(&Params::new().with("ids", vec!["1", "x"]))
            .unwrap_err();
        assert!(matches!(err, RenderError::RepeatedPatternMismatch { .. }));
    }

    #[test]
    fn validation_can_be_disabled() {
        let options = PathOptions::builder().validate(false).build().unwrap();
        let to_path = compile("/:id(\\d+)", &options).unwrap();
        assert_eq!(
            to_path.render(&Params::new().with("id", "abc")).unwrap(),
            "/abc"
        );
    }

    #[test]
    fn encoder_receives_key_and_runs_before_validation() {
        let options = PathOptions::builder()
            .encode_value(|value, key| {
                if key.name == Name::from("q") {
                    value.replace(' ', "%20")
                } else {
                    value.to_string()
                }
            })
            .build()
            .unwrap();
        let to_path = compile("/search/:q", &options).unwrap();
        assert_eq!(
            to_path.render(&Params::new().with("q", "a b")).unwrap(),
            "/search/a%20b"
        );
    }

    #[test]
    fn ordinal_keys_are_rendered_by_position() {
        let to_path = renderer("/(\\d+)/*");
        let params = Params::new().with(0usize, "42").with(1usize, "rest/of/path");
        assert_eq!(to_path.render(&params).unwrap(), "/42/rest/of/path");
    }
}
