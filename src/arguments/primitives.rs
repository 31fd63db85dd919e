// src/arguments/primitives.rs

use crate::{
    arguments::{Argument, ArgumentError},
    core::reader::TokenReader,
    models::ArgValue,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"^https?://\S+$").expect("valid URL regex");
}

/// A whole number, optionally range-checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntArg {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntArg {
    /// Accepts any `i64`.
    pub fn any() -> Self {
        Self::default()
    }

    /// Accepts values in the inclusive range `min..=max`.
    pub fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Accepts values `>= min`.
    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }
}

impl Argument for IntArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        let value: i64 = token
            .parse()
            .map_err(|_| ArgumentError::Invalid(format!("'{}' is not a whole number", token)))?;
        if let Some(min) = self.min
            && value < min
        {
            return Err(ArgumentError::Invalid(format!(
                "{} is below the minimum of {}",
                value, min
            )));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Err(ArgumentError::Invalid(format!(
                "{} is above the maximum of {}",
                value, max
            )));
        }
        Ok(ArgValue::Int(value))
    }
}

/// A floating-point number.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatArg;

impl Argument for FloatArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        let value: f64 = token
            .parse()
            .map_err(|_| ArgumentError::Invalid(format!("'{}' is not a number", token)))?;
        Ok(ArgValue::Float(value))
    }
}

/// A yes/no switch. Accepts the usual spellings, case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolArg;

impl Argument for BoolArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        match token.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(ArgValue::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(ArgValue::Bool(false)),
            _ => Err(ArgumentError::Invalid(format!(
                "'{}' is not a yes/no value",
                token
            ))),
        }
    }
}

/// Exactly one token, taken verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordArg;

impl Argument for WordArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        Ok(ArgValue::Str(token.to_string()))
    }
}

/// Greedily consumes every remaining token and joins them with single
/// spaces. At least one token is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemainderArg;

impl Argument for RemainderArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let mut parts = vec![reader.next()?.to_string()];
        while reader.has_next() {
            parts.push(reader.next()?.to_string());
        }
        Ok(ArgValue::Str(parts.join(" ")))
    }
}

/// One token out of a fixed, case-insensitive choice set. The parsed value
/// is the canonical spelling from the set, not the user's casing.
#[derive(Debug, Clone)]
pub struct ChoiceArg {
    choices: Vec<String>,
}

impl ChoiceArg {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Argument for ChoiceArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        match self
            .choices
            .iter()
            .find(|choice| choice.eq_ignore_ascii_case(token))
        {
            Some(choice) => Ok(ArgValue::Str(choice.clone())),
            None => Err(ArgumentError::Invalid(format!(
                "'{}' is not one of [{}]",
                token,
                self.choices.join(", ")
            ))),
        }
    }
}

/// An http(s) URL, validated by shape only.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlArg;

impl Argument for UrlArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        if URL_RE.is_match(token) {
            Ok(ArgValue::Str(token.to_string()))
        } else {
            Err(ArgumentError::Invalid(format!("'{}' is not a URL", token)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(args: &[&str]) -> TokenReader {
        // Token 0 stands in for the command name.
        let mut tokens = vec!["!cmd".to_string()];
        tokens.extend(args.iter().map(|s| s.to_string()));
        TokenReader::new(tokens)
    }

    #[test]
    fn test_int_bounds() {
        assert_eq!(
            IntArg::any().parse(&mut reader(&["-3"])).unwrap(),
            ArgValue::Int(-3)
        );
        assert!(IntArg::between(1, 10).parse(&mut reader(&["0"])).is_err());
        assert!(IntArg::between(1, 10).parse(&mut reader(&["11"])).is_err());
        assert!(IntArg::any().parse(&mut reader(&["ten"])).is_err());
        assert!(IntArg::any().parse(&mut reader(&[])).is_err());
    }

    #[test]
    fn test_bool_spellings() {
        for token in ["true", "YES", "on", "1"] {
            assert_eq!(
                BoolArg.parse(&mut reader(&[token])).unwrap(),
                ArgValue::Bool(true)
            );
        }
        for token in ["false", "No", "off", "0"] {
            assert_eq!(
                BoolArg.parse(&mut reader(&[token])).unwrap(),
                ArgValue::Bool(false)
            );
        }
        assert!(BoolArg.parse(&mut reader(&["maybe"])).is_err());
    }

    #[test]
    fn test_remainder_joins_all_tokens() {
        let mut r = reader(&["hello", "wide", "world"]);
        assert_eq!(
            RemainderArg.parse(&mut r).unwrap(),
            ArgValue::Str("hello wide world".to_string())
        );
        assert!(!r.has_next());
        assert!(RemainderArg.parse(&mut reader(&[])).is_err());
    }

    #[test]
    fn test_choice_returns_canonical_spelling() {
        let arg = ChoiceArg::new(["add", "remove"]);
        assert_eq!(
            arg.parse(&mut reader(&["ADD"])).unwrap(),
            ArgValue::Str("add".to_string())
        );
        assert!(arg.parse(&mut reader(&["delete"])).is_err());
    }

    #[test]
    fn test_url_shape() {
        assert!(UrlArg.parse(&mut reader(&["https://example.com/x"])).is_ok());
        assert!(UrlArg.parse(&mut reader(&["ftp://example.com"])).is_err());
        assert!(UrlArg.parse(&mut reader(&["example.com"])).is_err());
    }
}
