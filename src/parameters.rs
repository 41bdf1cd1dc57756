//! Attribute tail decoding.
//!
//! A tail is a whitespace separated list of `key` or `key=value` tokens.
//! Values may be double quoted, single quoted, or bare; a backslash escapes
//! the character after it but is kept in the decoded text. The whole tail has
//! to decode, otherwise nothing does.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use thiserror::Error;
use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::token::{any, none_of, one_of, take_while};
use winnow::{ModalResult, Parser};

use crate::config::EmptyValue;

/// Whitespace as ECMAScript's `\s` defines it: Unicode `White_Space` without
/// U+0085, plus the byte order mark.
pub(crate) fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Largest integer a JSON consumer can hold without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub type Parameters = BTreeMap<String, ParameterValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl ParameterValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParameterValue::Bool(b) => serializer.serialize_bool(*b),
            // `3` stays `3` on the wire rather than becoming `3.0`.
            ParameterValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            ParameterValue::Number(n) => serializer.serialize_f64(*n),
            ParameterValue::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Why an attribute tail failed to decode. Offsets are byte offsets into the
/// tail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected a parameter key at byte {offset}, found {found:?}")]
    ExpectedKey { offset: usize, found: char },
    #[error("expected whitespace before byte {offset}, found {found:?}")]
    MissingSeparator { offset: usize, found: char },
    #[error("parameter `{key}` has no value after `=` at byte {offset}")]
    MissingValue { key: String, offset: usize },
    #[error("unterminated {quote} quote in parameter `{key}` at byte {offset}")]
    UnterminatedQuote {
        key: String,
        quote: char,
        offset: usize,
    },
}

/// Decodes `tail` with the default empty-value handling.
pub fn decode_parameters(tail: &str) -> Result<Parameters, DecodeError> {
    decode_parameters_with(tail, EmptyValue::default())
}

pub fn decode_parameters_with(
    tail: &str,
    empty_value: EmptyValue,
) -> Result<Parameters, DecodeError> {
    let mut input = tail;
    let mut parameters = Parameters::new();
    let mut first = true;

    loop {
        let rest = input.trim_start_matches(is_space);
        let separated = first || rest.len() < input.len();
        input = rest;

        let Some(found) = input.chars().next() else {
            break;
        };
        let offset = tail.len() - input.len();
        if !separated {
            return Err(DecodeError::MissingSeparator { offset, found });
        }

        let key = key_token
            .parse_next(&mut input)
            .map_err(|_| DecodeError::ExpectedKey { offset, found })?;

        let raw = match equals.parse_next(&mut input) {
            Ok(Some(_)) => Some(value_of(key, tail, &mut input)?),
            _ => None,
        };

        // Repeated keys: the later one wins.
        parameters.insert(key.to_string(), coerce(raw, empty_value));
        first = false;
    }

    Ok(parameters)
}

fn value_of<'s>(key: &str, tail: &str, input: &mut &'s str) -> Result<&'s str, DecodeError> {
    let start = *input;
    let offset = tail.len() - start.len();

    value.parse_next(input).map_err(|_| match start.chars().next() {
        Some(quote @ ('"' | '\'')) => DecodeError::UnterminatedQuote {
            key: key.to_string(),
            quote,
            offset,
        },
        _ => DecodeError::MissingValue {
            key: key.to_string(),
            offset,
        },
    })
}

fn coerce(raw: Option<&str>, empty_value: EmptyValue) -> ParameterValue {
    match raw {
        None | Some("true") => ParameterValue::Bool(true),
        Some("false") => ParameterValue::Bool(false),
        Some("") => match empty_value {
            EmptyValue::Verbatim => ParameterValue::String(String::new()),
            EmptyValue::True => ParameterValue::Bool(true),
        },
        Some(raw) => match number(raw) {
            Some(n) => ParameterValue::Number(n),
            None => ParameterValue::String(raw.to_string()),
        },
    }
}

/// Reads `raw` as a base-10 number if nothing else is in it.
fn number(raw: &str) -> Option<f64> {
    let literal = decimal.parse(raw).ok()?;
    literal.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn decimal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

fn key_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., ('a'..='z', 'A'..='Z', '0'..='9', '_', '-')).parse_next(input)
}

fn equals(input: &mut &str) -> ModalResult<Option<char>> {
    opt('=').parse_next(input)
}

fn value<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((quoted('"'), quoted('\''), bare)).parse_next(input)
}

/// Text between a pair of `quote`s, possibly empty.
///
/// The first unescaped `quote` closes the value. When every later `quote` is
/// escaped, the last of them closes it instead and the backslash before it is
/// part of the value, so `"C:\dir\"` reads as `C:\dir\`.
fn quoted<'s>(quote: char) -> impl Parser<&'s str, &'s str, ErrMode<ContextError>> {
    move |input: &mut &'s str| {
        let opened: ModalResult<char> = one_of(quote).parse_next(input);
        opened?;

        let body: &'s str = *input;
        let scanned: ModalResult<&'s str> =
            repeat::<_, _, (), _, _>(0.., alt((preceded('\\', any), none_of(quote))))
                .take()
                .parse_next(input);
        let scanned = scanned?;

        let closed: ModalResult<Option<char>> = opt(quote).parse_next(input);
        if closed?.is_some() {
            return Ok(scanned);
        }

        let end = body
            .rfind(quote)
            .ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
        *input = &body[end + quote.len_utf8()..];
        Ok(&body[..end])
    }
}

fn bare<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    repeat::<_, _, (), _, _>(
        1..,
        alt((
            preceded('\\', any),
            none_of(|c: char| c == '"' || c == '\'' || is_space(c)),
        )),
    )
    .take()
    .parse_next(input)
}
