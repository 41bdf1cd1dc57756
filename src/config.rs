use serde::Deserialize;

use crate::node::Dialect;

/// What an explicitly empty quoted value (`key=""`) decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyValue {
    /// Keep the empty string.
    #[default]
    Verbatim,
    /// Treat it like a bare key: boolean `true`.
    True,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub empty_value: EmptyValue,
    /// Dialects the parser looks inside. Nodes of any other dialect are
    /// treated as not applicable.
    pub dialects: Vec<Dialect>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            empty_value: EmptyValue::default(),
            dialects: Dialect::ALL.to_vec(),
        }
    }
}

impl ParseOptions {
    /// HTML comments only, empty values read as `true`.
    pub fn legacy() -> Self {
        Self {
            empty_value: EmptyValue::True,
            dialects: vec![Dialect::Html],
        }
    }

    pub fn with_empty_value(mut self, empty_value: EmptyValue) -> Self {
        self.empty_value = empty_value;
        self
    }

    pub fn with_dialects(mut self, dialects: impl IntoIterator<Item = Dialect>) -> Self {
        self.dialects = dialects.into_iter().collect();
        self
    }

    pub fn allows(&self, dialect: Dialect) -> bool {
        self.dialects.contains(&dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_allow_every_dialect() {
        let options = ParseOptions::default();
        assert_eq!(options.empty_value, EmptyValue::Verbatim);
        assert!(Dialect::ALL.iter().all(|d| options.allows(*d)));
    }

    #[test]
    fn legacy_is_html_only() {
        let options = ParseOptions::legacy();
        assert_eq!(options.empty_value, EmptyValue::True);
        assert!(options.allows(Dialect::Html));
        assert!(!options.allows(Dialect::Bare));
        assert!(!options.allows(Dialect::Expression));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"empty_value": "true"}"#).unwrap();
        assert_eq!(
            options,
            ParseOptions::default().with_empty_value(EmptyValue::True)
        );

        let options: ParseOptions =
            serde_json::from_str(r#"{"dialects": ["expression"]}"#).unwrap();
        assert_eq!(options.dialects, vec![Dialect::Expression]);
        assert_eq!(options.empty_value, EmptyValue::Verbatim);
    }
}
