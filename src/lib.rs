pub mod analysis;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connector;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::{Error, Result};
pub use ir::{Level, TopicNode, TopicTree};
pub use layout::{MindmapLayout, Placement, Side, compute_layout, wrap_label};
pub use render::{OutputFormat, render_pdf, render_svg, write_output};

use std::path::Path;

/// Lay out `tree` on the configured page and return the page as SVG.
pub fn render_mindmap_svg(tree: &TopicTree, config: &Config) -> String {
    let layout = compute_layout(tree, &config.layout, config.render.width, config.render.height);
    render_svg(&layout, &config.render)
}

/// Lay out, draw and write `tree` to `output`. The destination is written exactly once,
/// including for a tree with no main topics.
pub fn render_mindmap_to_file(
    tree: &TopicTree,
    output: &Path,
    format: OutputFormat,
    config: &Config,
) -> Result<MindmapLayout> {
    let layout = compute_layout(tree, &config.layout, config.render.width, config.render.height);
    let svg = render_svg(&layout, &config.render);
    write_output(&svg, output, format, &config.render)?;
    Ok(layout)
}
