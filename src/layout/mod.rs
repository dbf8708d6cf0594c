mod radial;
pub mod text;

pub use radial::SIDE_TIE_TOLERANCE;
pub use text::{max_chars_per_line, wrap_label};

use crate::config::LayoutConfig;
use crate::connector::ConnectorKind;
use crate::ir::{Level, TopicTree};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub line_height: f32,
    pub height: f32,
}

/// Which half of the page a main topic sits on. Its whole subtree fans out that way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    /// Right unless `x` is clearly left of `center_x`; a topic straight above or below
    /// the center counts as right.
    pub fn classify(x: f32, center_x: f32) -> Self {
        if x < center_x - SIDE_TIE_TOLERANCE {
            Self::Left
        } else {
            Self::Right
        }
    }

    pub fn direction(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Angle of the horizontal axis pointing away from the center on this side.
    pub fn axis_angle(self) -> f32 {
        match self {
            Self::Left => std::f32::consts::PI,
            Self::Right => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub index: usize,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub level: Level,
    pub side: Option<Side>,
    /// Direction from the parent anchor to this one, radians in `[0, 2π)`.
    pub inbound_angle: f32,
    pub parent: Option<usize>,
    pub sibling_index: usize,
    pub text: TextBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub from: usize,
    pub to: usize,
    pub kind: ConnectorKind,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MindmapLayout {
    pub width: f32,
    pub height: f32,
    pub center: (f32, f32),
    pub placements: Vec<Placement>,
    pub edges: Vec<EdgeLayout>,
    /// Nodes dropped because they sit below the leaf level.
    pub truncated: usize,
}

impl MindmapLayout {
    pub fn central(&self) -> Option<&Placement> {
        self.placements.first()
    }

    pub fn parent_of(&self, placement: &Placement) -> Option<&Placement> {
        placement.parent.and_then(|idx| self.placements.get(idx))
    }

    /// Each placement together with its parent's placement (`None` for the central node).
    pub fn pairs(&self) -> impl Iterator<Item = (&Placement, Option<&Placement>)> + '_ {
        self.placements
            .iter()
            .map(move |placement| (placement, self.parent_of(placement)))
    }

    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &Placement> + '_ {
        self.placements.iter().filter(move |p| p.level == level)
    }

    /// Placements whose box reaches past the page edge.
    pub fn off_page(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| {
                let style = crate::theme::node_style(p.level);
                let half_w = style.box_width / 2.0;
                let half_h = style.box_height / 2.0;
                p.x - half_w < 0.0
                    || p.y - half_h < 0.0
                    || p.x + half_w > self.width
                    || p.y + half_h > self.height
            })
            .count()
    }
}

/// Place every node of `tree` on a `width` x `height` page.
pub fn compute_layout(tree: &TopicTree, config: &LayoutConfig, width: f32, height: f32) -> MindmapLayout {
    let layout = radial::compute_radial_layout(tree, config, width, height);
    tracing::debug!(
        nodes = layout.placements.len(),
        edges = layout.edges.len(),
        truncated = layout.truncated,
        off_page = layout.off_page(),
        "computed radial layout"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TopicNode;

    #[test]
    fn side_ties_resolve_right() {
        assert_eq!(Side::classify(500.0, 500.0), Side::Right);
        assert_eq!(Side::classify(500.0 - 1e-5, 500.0), Side::Right);
        assert_eq!(Side::classify(499.0, 500.0), Side::Left);
        assert_eq!(Side::classify(501.0, 500.0), Side::Right);
    }

    #[test]
    fn pairs_link_children_to_parents() {
        let tree = TopicTree::with_main_topics(
            "Root",
            vec![TopicNode::with_children("A", vec![TopicNode::new("A1")])],
        );
        let layout = compute_layout(&tree, &LayoutConfig::default(), 1000.0, 800.0);
        let pairs: Vec<(&str, Option<&str>)> = layout
            .pairs()
            .map(|(p, parent)| (p.label.as_str(), parent.map(|q| q.label.as_str())))
            .collect();
        assert_eq!(
            pairs,
            vec![("Root", None), ("A", Some("Root")), ("A1", Some("A"))]
        );
    }

    #[test]
    fn off_page_counts_boxes_past_the_edge() {
        let tree = TopicTree::with_main_topics("Root", vec![TopicNode::new("A")]);
        let small = compute_layout(&tree, &LayoutConfig::default(), 400.0, 400.0);
        assert_eq!(small.off_page(), 1);
        let large = compute_layout(&tree, &LayoutConfig::default(), 2000.0, 2000.0);
        assert_eq!(large.off_page(), 0);
    }
}
