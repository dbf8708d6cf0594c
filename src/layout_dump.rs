use crate::connector::{Connector, ConnectorKind};
use crate::ir::TopicTree;
use crate::layout::MindmapLayout;
use crate::theme::node_style;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub central_topic: String,
    pub width: f32,
    pub height: f32,
    pub center: [f32; 2],
    pub truncated: usize,
    pub off_page: usize,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub index: usize,
    pub label: String,
    pub level: String,
    pub side: Option<String>,
    pub x: f32,
    pub y: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub inbound_angle_degrees: f32,
    pub parent: Option<usize>,
    pub label_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: usize,
    pub to: usize,
    pub kind: ConnectorKind,
    pub color: String,
    pub control: Option<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &MindmapLayout, tree: &TopicTree) -> Self {
        let nodes = layout
            .placements
            .iter()
            .map(|placement| {
                let style = node_style(placement.level);
                NodeDump {
                    index: placement.index,
                    label: placement.label.clone(),
                    level: placement.level.as_str().to_string(),
                    side: placement.side.map(|side| format!("{side:?}").to_lowercase()),
                    x: placement.x,
                    y: placement.y,
                    box_width: style.box_width,
                    box_height: style.box_height,
                    inbound_angle_degrees: placement.inbound_angle.to_degrees(),
                    parent: placement.parent,
                    label_lines: placement.text.lines.clone(),
                }
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| {
                let control = match (layout.placements.get(edge.from), layout.placements.get(edge.to)) {
                    (Some(from), Some(to)) => {
                        match Connector::between((from.x, from.y), (to.x, to.y), edge.kind) {
                            Connector::Quadratic { control, .. } => Some([control.0, control.1]),
                            Connector::Line { .. } => None,
                        }
                    }
                    _ => None,
                };
                EdgeDump {
                    from: edge.from,
                    to: edge.to,
                    kind: edge.kind,
                    color: edge.color.to_string(),
                    control,
                }
            })
            .collect();

        LayoutDump {
            central_topic: tree.central_topic().to_string(),
            width: layout.width,
            height: layout.height,
            center: [layout.center.0, layout.center.1],
            truncated: layout.truncated,
            off_page: layout.off_page(),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &MindmapLayout, tree: &TopicTree) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create layout dump {}", path.display()))?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, tree);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::TopicNode;
    use crate::layout::compute_layout;

    #[test]
    fn dump_lists_nodes_and_control_points() {
        let tree = TopicTree::with_main_topics(
            "Root",
            vec![TopicNode::with_children(
                "A",
                vec![TopicNode::with_children("A1", vec![TopicNode::new("leaf")])],
            )],
        );
        let layout = compute_layout(&tree, &LayoutConfig::default(), 1600.0, 1200.0);
        let dump = LayoutDump::from_layout(&layout, &tree);
        assert_eq!(dump.nodes.len(), 4);
        assert_eq!(dump.nodes[1].side.as_deref(), Some("right"));
        assert_eq!(dump.nodes[0].side, None);
        assert!(dump.edges[0].control.is_some());
        assert!(dump.edges[2].control.is_none());

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["nodes"][3]["level"], "leaf");
        assert_eq!(json["edges"][2]["kind"], "straight");
    }

    #[test]
    fn writes_pretty_json() {
        let tree = TopicTree::new("Root");
        let layout = compute_layout(&tree, &LayoutConfig::default(), 800.0, 600.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        write_layout_dump(&path, &layout, &tree).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"central_topic\": \"Root\""));
    }
}
