use crate::ir::Level;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Box geometry and colors for one node level.
#[derive(Debug, Clone, Serialize)]
pub struct NodeStyle {
    pub box_width: f32,
    pub box_height: f32,
    pub fill_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    pub font_size: f32,
}

impl NodeStyle {
    /// Color used for connectors leaving a node of this level.
    pub fn accent_color(&self) -> &'static str {
        self.fill_color
    }
}

pub struct StyleRegistry {
    central: NodeStyle,
    main: NodeStyle,
    sub: NodeStyle,
    leaf: NodeStyle,
}

impl StyleRegistry {
    fn classic() -> Self {
        Self {
            central: NodeStyle {
                box_width: 300.0,
                box_height: 100.0,
                fill_color: "#4A86E8",
                border_color: "#2A66C8",
                text_color: "#FFFFFF",
                font_size: 18.0,
            },
            main: NodeStyle {
                box_width: 250.0,
                box_height: 80.0,
                fill_color: "#93C47D",
                border_color: "#73A45D",
                text_color: "#000000",
                font_size: 14.0,
            },
            sub: NodeStyle {
                box_width: 220.0,
                box_height: 70.0,
                fill_color: "#FFD966",
                border_color: "#DFB946",
                text_color: "#000000",
                font_size: 12.0,
            },
            leaf: NodeStyle {
                box_width: 200.0,
                box_height: 60.0,
                fill_color: "#F9CB9C",
                border_color: "#D9AB7C",
                text_color: "#000000",
                font_size: 10.0,
            },
        }
    }

    pub fn get(&self, level: Level) -> &NodeStyle {
        match level {
            Level::Central => &self.central,
            Level::Main => &self.main,
            Level::Sub => &self.sub,
            Level::Leaf => &self.leaf,
        }
    }
}

static NODE_STYLES: Lazy<StyleRegistry> = Lazy::new(StyleRegistry::classic);

pub fn node_style(level: Level) -> &'static NodeStyle {
    NODE_STYLES.get(level)
}

pub const SHADOW_COLOR: &str = "#000000";
pub const SHADOW_OPACITY: f32 = 0.1;
pub const BACKGROUND: &str = "#FFFFFF";
pub const DEBUG_BORDER: &str = "#FF0000";
pub const DEBUG_TEXT: &str = "#000000";

/// Anchor marker color and radius in the debug overlay.
pub fn debug_marker(level: Level) -> (&'static str, f32) {
    match level {
        Level::Central => ("#FF0000", 5.0),
        Level::Main => ("#FF0000", 5.0),
        Level::Sub => ("#0000FF", 3.0),
        Level::Leaf => ("#008000", 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_shrink_with_depth() {
        let widths: Vec<f32> = Level::ALL.iter().map(|l| node_style(*l).box_width).collect();
        assert!(widths.windows(2).all(|pair| pair[0] > pair[1]));
        let fonts: Vec<f32> = Level::ALL.iter().map(|l| node_style(*l).font_size).collect();
        assert_eq!(fonts, vec![18.0, 14.0, 12.0, 10.0]);
    }

    #[test]
    fn registry_is_shared() {
        let a = node_style(Level::Main) as *const NodeStyle;
        let b = node_style(Level::Main) as *const NodeStyle;
        assert_eq!(a, b);
        assert_eq!(node_style(Level::Central).accent_color(), "#4A86E8");
    }
}
