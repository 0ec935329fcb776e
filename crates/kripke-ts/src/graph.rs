//! Graph description types — the parser-facing interface.
//!
//! An external frontend parses a graph source file (node and edge
//! statements with attributes) into a [`GraphDesc`], either directly or
//! via the serde representation, and the core resolves it into a
//! [`crate::TranSys`]. The core never parses text.

use serde::{Deserialize, Serialize};

/// A parsed graph description: a flat list of statements in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphDesc {
    pub statements: Vec<GraphStmt>,
}

/// One statement of the graph description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum GraphStmt {
    /// A directed edge `from -> to`. Mentioning a node implicitly declares it.
    Transition { from: String, to: String },
    /// A node declaration with attributes.
    Node { name: String, attrs: Vec<NodeAttr> },
}

/// A node attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum NodeAttr {
    /// Graphical shape; `"box"` marks the node as an initial state.
    Shape { shape: String },
    /// Atomic propositions holding in the node.
    Labels { labels: Vec<String> },
}

impl GraphDesc {
    /// Convenience builder: add a transition statement.
    pub fn transition(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.statements.push(GraphStmt::Transition {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Convenience builder: add a node statement with attributes.
    pub fn node(mut self, name: impl Into<String>, attrs: Vec<NodeAttr>) -> Self {
        self.statements.push(GraphStmt::Node {
            name: name.into(),
            attrs,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let desc = GraphDesc::default()
            .transition("s0", "s1")
            .node(
                "s0",
                vec![
                    NodeAttr::Shape {
                        shape: "box".to_string(),
                    },
                    NodeAttr::Labels {
                        labels: vec!["p".to_string()],
                    },
                ],
            );
        let json = serde_json::to_string(&desc).unwrap();
        let back: GraphDesc = serde_json::from_str(&json).unwrap();
        assert_eq!(desc, back);
    }

    #[test]
    fn tagged_wire_format() {
        let json = r#"{"statements": [
            {"kind": "Transition", "from": "a", "to": "b"},
            {"kind": "Node", "name": "a", "attrs": [{"kind": "Shape", "shape": "box"}]}
        ]}"#;
        let desc: GraphDesc = serde_json::from_str(json).unwrap();
        assert_eq!(desc.statements.len(), 2);
    }
}
