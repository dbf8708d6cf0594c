use std::f32::consts::TAU;

use crate::config::LayoutConfig;
use crate::ir::{Level, TopicNode, TopicTree};
use crate::theme::node_style;

use super::text::label_block;
use super::{EdgeLayout, MindmapLayout, Placement, Side};

/// Main topics closer than this to the vertical center line count as right-side.
pub const SIDE_TIE_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct Slot {
    position: (f32, f32),
    angle: f32,
    side: Side,
}

struct RadialBuilder<'a> {
    config: &'a LayoutConfig,
    placements: Vec<Placement>,
    edges: Vec<EdgeLayout>,
    truncated: usize,
}

pub(super) fn compute_radial_layout(
    tree: &TopicTree,
    config: &LayoutConfig,
    width: f32,
    height: f32,
) -> MindmapLayout {
    let center = (width / 2.0, height / 2.0);
    let mut builder = RadialBuilder {
        config,
        placements: Vec::with_capacity(tree.node_count()),
        edges: Vec::with_capacity(tree.node_count().saturating_sub(1)),
        truncated: 0,
    };
    builder.place_subtree(&tree.root, Level::Central, center, None, None, 0.0, 0);

    MindmapLayout {
        width,
        height,
        center,
        placements: builder.placements,
        edges: builder.edges,
        truncated: builder.truncated,
    }
}

impl RadialBuilder<'_> {
    #[allow(clippy::too_many_arguments)]
    fn place_subtree(
        &mut self,
        node: &TopicNode,
        level: Level,
        position: (f32, f32),
        parent: Option<usize>,
        side: Option<Side>,
        inbound_angle: f32,
        sibling_index: usize,
    ) -> usize {
        let index = self.placements.len();
        let style = node_style(level);
        self.placements.push(Placement {
            index,
            label: node.label.clone(),
            x: position.0,
            y: position.1,
            level,
            side,
            inbound_angle: inbound_angle.rem_euclid(TAU),
            parent,
            sibling_index,
            text: label_block(&node.label, style, self.config),
        });
        if let Some(parent_idx) = parent {
            let parent_level = self.placements[parent_idx].level;
            self.edges.push(EdgeLayout {
                from: parent_idx,
                to: index,
                kind: inbound_connector(level),
                color: node_style(parent_level).accent_color(),
            });
        }

        if node.children.is_empty() {
            return index;
        }
        let Some(child_level) = level.child() else {
            let omitted = node.node_count() - 1;
            self.truncated += omitted;
            tracing::warn!(
                label = %node.label,
                omitted,
                "topic nested below leaf level; children dropped"
            );
            return index;
        };

        let slots = self.child_slots(child_level, position, node.children.len(), side);
        for (child_idx, (child, slot)) in node.children.iter().zip(slots).enumerate() {
            self.place_subtree(
                child,
                child_level,
                slot.position,
                Some(index),
                Some(slot.side),
                slot.angle,
                child_idx,
            );
        }
        index
    }

    fn child_slots(
        &self,
        child_level: Level,
        parent: (f32, f32),
        count: usize,
        side: Option<Side>,
    ) -> Vec<Slot> {
        match child_level {
            Level::Central => Vec::new(),
            Level::Main => ring_slots(parent, count, self.config),
            Level::Sub => fan_slots(parent, count, side.unwrap_or_default(), self.config),
            Level::Leaf => column_slots(parent, count, side.unwrap_or_default(), self.config),
        }
    }
}

fn inbound_connector(level: Level) -> crate::connector::ConnectorKind {
    use crate::connector::ConnectorKind;
    match level {
        Level::Central | Level::Main | Level::Sub => ConnectorKind::Curved,
        Level::Leaf => ConnectorKind::Straight,
    }
}

/// Main topics: evenly around a circle, clockwise from 12 o'clock.
fn ring_slots(center: (f32, f32), count: usize, config: &LayoutConfig) -> Vec<Slot> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = config.start_angle + i as f32 * step;
            let position = (
                center.0 + config.main_radius * angle.cos(),
                center.1 + config.main_radius * angle.sin(),
            );
            Slot {
                position,
                angle,
                side: Side::classify(position.0, center.0),
            }
        })
        .collect()
}

/// Subtopics: a fan of `fan_spread` radians centered on the side's horizontal axis.
fn fan_slots(parent: (f32, f32), count: usize, side: Side, config: &LayoutConfig) -> Vec<Slot> {
    let base = side.axis_angle();
    let (start, step) = if count > 1 {
        (
            base - config.fan_spread / 2.0,
            config.fan_spread / (count - 1) as f32,
        )
    } else {
        (base, 0.0)
    };
    (0..count)
        .map(|i| {
            let angle = start + i as f32 * step;
            Slot {
                position: (
                    parent.0 + config.branch_length * angle.cos(),
                    parent.1 + config.branch_length * angle.sin(),
                ),
                angle,
                side,
            }
        })
        .collect()
}

/// Leaves: a vertical column beside the parent, centered on its y, first leaf on top.
fn column_slots(parent: (f32, f32), count: usize, side: Side, config: &LayoutConfig) -> Vec<Slot> {
    let x = parent.0 + side.direction() * config.leaf_distance;
    let total = count.saturating_sub(1) as f32 * config.leaf_spacing;
    let start_y = parent.1 - total / 2.0;
    (0..count)
        .map(|i| {
            let y = start_y + i as f32 * config.leaf_spacing;
            Slot {
                position: (x, y),
                angle: (y - parent.1).atan2(x - parent.0),
                side,
            }
        })
        .collect()
}
