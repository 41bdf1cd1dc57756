use serde_json::Value;

use crate::config::ParseOptions;
use crate::error::{Error, Result};
use crate::marker::parse_marker_with;

/// Parses a JSON-encoded node and returns the marker as JSON, or `null` when
/// the node holds none.
pub fn parse_marker_json(node_json: &str, options: &ParseOptions) -> Result<String> {
    let node: Value = serde_json::from_str(node_json).map_err(Error::Node)?;
    let marker = parse_marker_with(&node, options);
    serde_json::to_string_pretty(&marker).map_err(Error::Serialize)
}

pub fn parse_options_json(options_json: &str) -> Result<ParseOptions> {
    serde_json::from_str(options_json).map_err(Error::Options)
}
