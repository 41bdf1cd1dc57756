//! Marker extraction.
//!
//! Each dialect has its own whole-text grammar:
//!
//! - html: `ws* <!-- ws* NAME (ws+ TAIL)? ws* --> ws*`
//! - bare: `ws* NAME (ws+ TAIL)? ws*`
//! - expression: `ws* /* ws* NAME (ws+ TAIL)? ws* */ ws*`
//!
//! The tail is handed to [`decode_parameters_with`]; a tail that does not
//! decode means the node holds no marker at all.

use serde::Serialize;
use tracing::{debug, trace};
use winnow::combinator::{alt, eof, preceded, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::token::{rest, take_while};
use winnow::{ModalResult, Parser};

use crate::config::ParseOptions;
use crate::node::{Classify, Dialect, Node};
use crate::parameters::{decode_parameters_with, is_space, Parameters};

/// A directive found in a comment node.
///
/// `name` and `attributes` borrow from the node's text, and `node` is the
/// caller's own node, so a marker can be used to find and replace it in the
/// tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker<'a, N = Node> {
    pub name: &'a str,
    /// Everything after the name, trimmed.
    pub attributes: &'a str,
    pub parameters: Parameters,
    pub node: &'a N,
}

/// Parses a marker out of `node` using [`ParseOptions::default`].
pub fn parse_marker<N: Classify>(node: &N) -> Option<Marker<'_, N>> {
    parse_marker_with(node, &ParseOptions::default())
}

pub fn parse_marker_with<'a, N: Classify>(
    node: &'a N,
    options: &ParseOptions,
) -> Option<Marker<'a, N>> {
    let Some(source) = node.classify() else {
        trace!("not a comment node");
        return None;
    };

    if !options.allows(source.dialect) {
        trace!(dialect = ?source.dialect, "dialect disabled");
        return None;
    }

    let Some((name, attributes)) = split(source.dialect, source.text) else {
        trace!(dialect = ?source.dialect, "comment is not a marker");
        return None;
    };

    match decode_parameters_with(attributes, options.empty_value) {
        Ok(parameters) => Some(Marker {
            name,
            attributes,
            parameters,
            node,
        }),
        Err(error) => {
            debug!(marker = name, %error, "ignoring marker with malformed parameters");
            None
        }
    }
}

/// Splits a comment into its name and attribute tail, or `None` if the text
/// as a whole does not fit the dialect's grammar.
pub fn split(dialect: Dialect, text: &str) -> Option<(&str, &str)> {
    let parsed = match dialect.delimiters() {
        Some((open, close)) => delimited_marker(open, close).parse(text),
        None => marker_body.parse(text),
    };
    parsed.ok()
}

/// `ws* OPEN body CLOSE ws*`, where CLOSE is the last occurrence of the
/// closing delimiter.
fn delimited_marker<'s>(
    open: &'static str,
    close: &'static str,
) -> impl Parser<&'s str, (&'s str, &'s str), ErrMode<ContextError>> {
    move |input: &mut &'s str| {
        (space0, open).void().parse_next(input)?;

        let remaining: &'s str = *input;
        let interior = remaining
            .trim_end_matches(is_space)
            .strip_suffix(close)
            .ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
        rest.void().parse_next(input)?;

        marker_body
            .parse(interior)
            .map_err(|_| ErrMode::Backtrack(ContextError::new()))
    }
}

/// `ws* NAME (ws+ TAIL)? ws*`
fn marker_body<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str)> {
    let name = preceded(space0, marker_name).parse_next(input)?;
    let tail = alt((
        terminated(space0, eof).value(""),
        preceded(space1, rest.map(|tail: &'s str| tail.trim_end_matches(is_space))),
    ))
    .parse_next(input)?;
    Ok((name, tail))
}

fn marker_name<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., ('a'..='z', 'A'..='Z', '0'..='9', '-')).parse_next(input)
}

fn space0<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(0.., is_space).parse_next(input)
}

fn space1<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., is_space).parse_next(input)
}
