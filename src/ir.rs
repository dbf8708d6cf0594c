use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_CENTRAL_TOPIC: &str = "Mind Map";

/// Visual tier of a node. Depth 0 is the central node, depth 3 and below are leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Central,
    Main,
    Sub,
    Leaf,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Central, Level::Main, Level::Sub, Level::Leaf];

    /// Level given to this node's children, or `None` when the layout has no
    /// rule for them.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Central => Some(Self::Main),
            Self::Main => Some(Self::Sub),
            Self::Sub => Some(Self::Leaf),
            Self::Leaf => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Main => "main",
            Self::Sub => "sub",
            Self::Leaf => "leaf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNode {
    pub label: String,
    pub children: Vec<TopicNode>,
}

impl TopicNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<TopicNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    pub fn push(&mut self, child: TopicNode) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TopicNode::node_count).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTree {
    pub root: TopicNode,
}

impl TopicTree {
    pub fn new(central_topic: impl Into<String>) -> Self {
        Self {
            root: TopicNode::new(central_topic),
        }
    }

    pub fn with_main_topics(central_topic: impl Into<String>, main_topics: Vec<TopicNode>) -> Self {
        Self {
            root: TopicNode::with_children(central_topic, main_topics),
        }
    }

    pub fn central_topic(&self) -> &str {
        &self.root.label
    }

    pub fn main_topics(&self) -> &[TopicNode] {
        &self.root.children
    }

    pub fn push_main_topic(&mut self, topic: TopicNode) {
        self.root.push(topic);
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Parse the `{ central_topic, main_topics: [{ text, subtopics }] }` interchange
    /// format. Missing `subtopics` keys are treated as empty.
    pub fn from_json(input: &str) -> Result<Self> {
        let doc: HierarchyDocument = serde_json::from_str(input)?;
        Ok(doc.into())
    }

    pub fn to_json(&self) -> Result<String> {
        let doc = HierarchyDocument::from(self);
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HierarchyDocument {
    #[serde(default = "default_central_topic")]
    central_topic: String,
    #[serde(default)]
    main_topics: Vec<TopicEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TopicEntry {
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subtopics: Vec<TopicEntry>,
}

fn default_central_topic() -> String {
    DEFAULT_CENTRAL_TOPIC.to_string()
}

impl From<TopicEntry> for TopicNode {
    fn from(entry: TopicEntry) -> Self {
        TopicNode {
            label: entry.text,
            children: entry.subtopics.into_iter().map(TopicNode::from).collect(),
        }
    }
}

impl From<&TopicNode> for TopicEntry {
    fn from(node: &TopicNode) -> Self {
        TopicEntry {
            text: node.label.clone(),
            subtopics: node.children.iter().map(TopicEntry::from).collect(),
        }
    }
}

impl From<HierarchyDocument> for TopicTree {
    fn from(doc: HierarchyDocument) -> Self {
        TopicTree::with_main_topics(
            doc.central_topic,
            doc.main_topics.into_iter().map(TopicNode::from).collect(),
        )
    }
}

impl From<&TopicTree> for HierarchyDocument {
    fn from(tree: &TopicTree) -> Self {
        HierarchyDocument {
            central_topic: tree.root.label.clone(),
            main_topics: tree.root.children.iter().map(TopicEntry::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subtopics_are_empty() {
        let tree = TopicTree::from_json(
            r#"{"central_topic": "Root", "main_topics": [{"text": "A"}, {"text": "B", "subtopics": [{"text": "B1"}]}]}"#,
        )
        .unwrap();
        assert_eq!(tree.central_topic(), "Root");
        assert_eq!(tree.main_topics().len(), 2);
        assert!(tree.main_topics()[0].children.is_empty());
        assert_eq!(tree.main_topics()[1].children[0].label, "B1");
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn missing_central_topic_uses_default() {
        let tree = TopicTree::from_json(r#"{"main_topics": []}"#).unwrap();
        assert_eq!(tree.central_topic(), "Mind Map");
        assert!(tree.main_topics().is_empty());
    }

    #[test]
    fn rejects_entries_without_text() {
        assert!(TopicTree::from_json(r#"{"main_topics": [{"subtopics": []}]}"#).is_err());
    }

    #[test]
    fn json_output_is_accepted_back() {
        let tree = TopicTree::with_main_topics(
            "Root",
            vec![TopicNode::with_children("A", vec![TopicNode::new("A1")])],
        );
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"central_topic\": \"Root\""));
        assert!(!json.contains("\"subtopics\": []"));
        assert_eq!(TopicTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn levels_descend_to_leaf() {
        assert_eq!(Level::Central.child(), Some(Level::Main));
        assert_eq!(Level::Main.child(), Some(Level::Sub));
        assert_eq!(Level::Sub.child(), Some(Level::Leaf));
        assert_eq!(Level::Leaf.child(), None);
        let nested = TopicNode::with_children(
            "a",
            vec![TopicNode::with_children("b", vec![TopicNode::new("c")])],
        );
        assert_eq!(nested.node_count(), 3);
    }
}
