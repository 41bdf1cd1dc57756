use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A syntax-tree node as produced by mdast / MDX tooling.
///
/// Only the node kinds that can carry a marker get their own variant. Every
/// other `type` lands in `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Html { value: String },
    Comment { value: String },
    MdxFlowExpression { value: String },
    MdxTextExpression { value: String },
    #[serde(other)]
    Unknown,
}

/// Comment grammar used by a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `<!-- name attributes -->`
    Html,
    /// `name attributes`, the node text is already the comment interior
    Bare,
    /// `/* name attributes */`
    Expression,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Html, Dialect::Bare, Dialect::Expression];

    /// Maps an mdast `type` string onto the dialect its `value` is written in.
    pub fn for_node_type(node_type: &str) -> Option<Self> {
        match node_type {
            "html" => Some(Dialect::Html),
            "comment" => Some(Dialect::Bare),
            "mdxFlowExpression" | "mdxTextExpression" => Some(Dialect::Expression),
            _ => None,
        }
    }

    pub fn delimiters(self) -> Option<(&'static str, &'static str)> {
        match self {
            Dialect::Html => Some(("<!--", "-->")),
            Dialect::Bare => None,
            Dialect::Expression => Some(("/*", "*/")),
        }
    }
}

/// The text of a recognized node, paired with the dialect to read it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSource<'a> {
    pub dialect: Dialect,
    pub text: &'a str,
}

impl<'a> CommentSource<'a> {
    pub fn new(dialect: Dialect, text: &'a str) -> Self {
        Self { dialect, text }
    }
}

/// Node shapes the marker parser can look inside.
///
/// Returning `None` means "not applicable": the value is not a node, or it is
/// a node of a kind that never carries a marker.
pub trait Classify {
    fn classify(&self) -> Option<CommentSource<'_>>;
}

impl Classify for Node {
    fn classify(&self) -> Option<CommentSource<'_>> {
        match self {
            Node::Html { value } => Some(CommentSource::new(Dialect::Html, value)),
            Node::Comment { value } => Some(CommentSource::new(Dialect::Bare, value)),
            Node::MdxFlowExpression { value } | Node::MdxTextExpression { value } => {
                Some(CommentSource::new(Dialect::Expression, value))
            }
            Node::Unknown => None,
        }
    }
}

impl Classify for Value {
    fn classify(&self) -> Option<CommentSource<'_>> {
        let object = self.as_object()?;
        let dialect = Dialect::for_node_type(object.get("type")?.as_str()?)?;
        let text = object.get("value")?.as_str()?;
        Some(CommentSource::new(dialect, text))
    }
}

impl<T: Classify> Classify for Option<T> {
    fn classify(&self) -> Option<CommentSource<'_>> {
        self.as_ref()?.classify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn non_objects_are_not_applicable() {
        assert_eq!(json!(null).classify(), None);
        assert_eq!(json!(42).classify(), None);
        assert_eq!(json!("<!--foo-->").classify(), None);
        assert_eq!(json!(["html", "<!--foo-->"]).classify(), None);
        assert_eq!(None::<Node>.classify(), None);
    }

    #[test]
    fn unknown_kinds_are_not_applicable() {
        assert_eq!(json!({"type": "paragraph", "children": []}).classify(), None);
        assert_eq!(json!({"type": "text", "value": "<!--foo-->"}).classify(), None);
        assert_eq!(json!({"value": "<!--foo-->"}).classify(), None);
    }

    #[test]
    fn known_kind_without_text_is_not_applicable() {
        assert_eq!(json!({"type": "html"}).classify(), None);
        assert_eq!(json!({"type": "html", "value": 3}).classify(), None);
    }

    #[test]
    fn json_values_pick_the_dialect_from_type() {
        let html = json!({"type": "html", "value": "<!--foo-->"});
        assert_eq!(
            html.classify(),
            Some(CommentSource::new(Dialect::Html, "<!--foo-->"))
        );

        let comment = json!({"type": "comment", "value": " foo "});
        assert_eq!(
            comment.classify(),
            Some(CommentSource::new(Dialect::Bare, " foo "))
        );

        for node_type in ["mdxFlowExpression", "mdxTextExpression"] {
            let expression = json!({"type": node_type, "value": "/* foo */"});
            assert_eq!(
                expression.classify(),
                Some(CommentSource::new(Dialect::Expression, "/* foo */"))
            );
        }
    }

    #[test]
    fn typed_nodes_deserialize_from_mdast_json() {
        let node: Node = serde_json::from_value(json!({
            "type": "mdxTextExpression",
            "value": "/* foo */",
            "position": {"start": {"line": 1, "column": 1}}
        }))
        .unwrap();
        assert_eq!(
            node,
            Node::MdxTextExpression {
                value: "/* foo */".to_string()
            }
        );

        let node: Node = serde_json::from_value(json!({"type": "heading", "depth": 2})).unwrap();
        assert_eq!(node, Node::Unknown);
        assert_eq!(node.classify(), None);
    }

    #[test]
    fn delimiters_per_dialect() {
        assert_eq!(Dialect::Html.delimiters(), Some(("<!--", "-->")));
        assert_eq!(Dialect::Bare.delimiters(), None);
        assert_eq!(Dialect::Expression.delimiters(), Some(("/*", "*/")));
    }
}
