use crate::config::RenderConfig;
use crate::connector::{Connector, ConnectorKind, connection_svg};
use crate::error::{Error, Result};
use crate::ir::Level;
use crate::layout::{MindmapLayout, Placement};
use crate::theme::{self, node_style};
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Draw the whole page: connectors first, then node boxes, then the optional debug
/// overlay. Nodes keep their computed coordinates even when they fall off the page.
pub fn render_svg(layout: &MindmapLayout, config: &RenderConfig) -> String {
    let width = layout.width;
    let height = layout.height;
    let mut svg = String::new();

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme::BACKGROUND
    );

    svg.push_str("<g class=\"connectors\">");
    for edge in &layout.edges {
        let (Some(from), Some(to)) = (layout.placements.get(edge.from), layout.placements.get(edge.to))
        else {
            continue;
        };
        let connector = Connector::between((from.x, from.y), (to.x, to.y), edge.kind);
        let stroke_width = match edge.kind {
            ConnectorKind::Curved => config.curved_edge_width,
            ConnectorKind::Straight => config.straight_edge_width,
        };
        svg.push_str(&connection_svg(&connector, edge.color, stroke_width));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for placement in &layout.placements {
        svg.push_str(&node_svg(placement, config));
    }
    svg.push_str("</g>");

    if config.debug {
        svg.push_str(&debug_overlay_svg(layout, config));
    }

    svg.push_str("</svg>");
    tracing::debug!(
        bytes = svg.len(),
        nodes = layout.placements.len(),
        debug = config.debug,
        "rendered svg"
    );
    svg
}

fn node_svg(placement: &Placement, config: &RenderConfig) -> String {
    let style = node_style(placement.level);
    let x = placement.x - style.box_width / 2.0;
    let y = placement.y - style.box_height / 2.0;
    let radius = config.corner_radius;
    let shadow = config.shadow_offset;
    let mut out = String::new();

    let _ = write!(
        out,
        "<g class=\"node node-{}\" data-index=\"{}\">",
        placement.level.as_str(),
        placement.index
    );
    let _ = write!(
        out,
        "<rect class=\"node-shadow\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{}\" fill-opacity=\"{}\"/>",
        x + shadow,
        y + shadow,
        style.box_width,
        style.box_height,
        theme::SHADOW_COLOR,
        theme::SHADOW_OPACITY
    );
    let _ = write!(
        out,
        "<rect class=\"node-box\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        style.box_width,
        style.box_height,
        style.fill_color,
        style.border_color,
        config.border_width
    );

    let text = &placement.text;
    if !text.lines.is_empty() {
        let start_y = placement.y - text.height / 2.0 + text.line_height;
        let _ = write!(
            out,
            "<text x=\"{:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
            placement.x,
            escape_xml(&config.font_family),
            style.font_size,
            style.text_color
        );
        for (idx, line) in text.lines.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { text.line_height };
            let _ = write!(
                out,
                "<tspan x=\"{:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                placement.x,
                escape_xml(line)
            );
        }
        out.push_str("</text>");
    }
    out.push_str("</g>");
    out
}

fn debug_overlay_svg(layout: &MindmapLayout, config: &RenderConfig) -> String {
    let mut out = String::from("<g class=\"debug\">");
    let _ = write!(
        out,
        "<rect x=\"10\" y=\"10\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
        (layout.width - 20.0).max(0.0),
        (layout.height - 20.0).max(0.0),
        theme::DEBUG_BORDER
    );
    let main_count = layout.at_level(Level::Main).count();
    if main_count > 0 {
        let _ = write!(
            out,
            "<text x=\"50\" y=\"50\" font-family=\"{}\" font-size=\"12\" fill=\"{}\">Number of main topics: {main_count}</text>",
            escape_xml(&config.font_family),
            theme::DEBUG_TEXT
        );
    }
    for placement in &layout.placements {
        let (color, radius) = theme::debug_marker(placement.level);
        let _ = write!(
            out,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" fill=\"{color}\"/>",
            placement.x, placement.y
        );
        let caption = match placement.level {
            Level::Main => Some(format!("Topic {}", placement.sibling_index)),
            Level::Sub => Some(format!("Sub {}", placement.sibling_index)),
            Level::Central | Level::Leaf => None,
        };
        if let Some(caption) = caption {
            let _ = write!(
                out,
                "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"10\" fill=\"{}\">{caption}</text>",
                placement.x,
                placement.y,
                escape_xml(&config.font_family),
                theme::DEBUG_TEXT
            );
        }
    }
    out.push_str("</g>");
    out
}

/// Convert the page SVG into a single-page PDF.
pub fn render_pdf(svg: &str, config: &RenderConfig) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = primary_font_family(&config.font_family);

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt)
        .map_err(|err| Error::SvgParse(err.to_string()))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|err| Error::PdfConvert(err.to_string()))
}

pub fn write_output_pdf(svg: &str, output: &Path, config: &RenderConfig) -> Result<()> {
    let pdf = render_pdf(svg, config)?;
    write_bytes(output, &pdf)
}

pub fn write_output_svg(svg: &str, output: &Path) -> Result<()> {
    write_bytes(output, svg.as_bytes())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, config: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = primary_font_family(&config.font_family);

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| Error::SvgParse(err.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| Error::Raster("failed to allocate pixmap".to_string()))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    let png = pixmap
        .encode_png()
        .map_err(|err| Error::Raster(err.to_string()))?;
    write_bytes(output, &png)
}

/// Finalize the page in `format` and write it to `output` in one call.
pub fn write_output(svg: &str, output: &Path, format: OutputFormat, config: &RenderConfig) -> Result<()> {
    match format {
        OutputFormat::Pdf => write_output_pdf(svg, output, config),
        OutputFormat::Svg => write_output_svg(svg, output),
        #[cfg(feature = "png")]
        OutputFormat::Png => write_output_png(svg, output, config),
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => Err(Error::Raster(
            "PNG output requires the `png` feature".to_string(),
        )),
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

fn primary_font_family(stack: &str) -> String {
    stack
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|part| !part.is_empty())
        .unwrap_or("Arial")
        .to_string()
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
