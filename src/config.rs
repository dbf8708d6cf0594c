use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A2 landscape, in points.
pub const PAGE_WIDTH: f32 = 1683.78;
pub const PAGE_HEIGHT: f32 = 1190.55;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub main_radius: f32,
    pub start_angle: f32,
    pub branch_length: f32,
    pub fan_spread: f32,
    pub leaf_distance: f32,
    pub leaf_spacing: f32,
    pub char_width_factor: f32,
    pub label_line_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            main_radius: 300.0,
            start_angle: 3.0 * std::f32::consts::FRAC_PI_2,
            branch_length: 230.0,
            fan_spread: std::f32::consts::FRAC_PI_3,
            leaf_distance: 180.0,
            leaf_spacing: 80.0,
            char_width_factor: 0.6,
            label_line_height: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub font_family: String,
    pub corner_radius: f32,
    pub shadow_offset: f32,
    pub border_width: f32,
    pub curved_edge_width: f32,
    pub straight_edge_width: f32,
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            corner_radius: 10.0,
            shadow_offset: 3.0,
            border_width: 2.0,
            curved_edge_width: 2.5,
            straight_edge_width: 2.0,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    main_radius: Option<f32>,
    branch_length: Option<f32>,
    fan_spread_degrees: Option<f32>,
    leaf_distance: Option<f32>,
    leaf_spacing: Option<f32>,
    char_width_factor: Option<f32>,
    label_line_height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    font_family: Option<String>,
    corner_radius: Option<f32>,
    shadow_offset: Option<f32>,
    debug: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_config_file(&contents).map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })?;
    apply_config_file(&mut config, parsed);
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn parse_config_file(contents: &str) -> std::result::Result<ConfigFile, String> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        // JSON5 fallback: comments and trailing commas.
        Err(strict) => json5::from_str::<ConfigFile>(contents)
            .map_err(|lenient| format!("{strict}; json5: {lenient}")),
    }
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.main_radius {
            config.layout.main_radius = v;
        }
        if let Some(v) = layout.branch_length {
            config.layout.branch_length = v;
        }
        if let Some(v) = layout.fan_spread_degrees {
            config.layout.fan_spread = v.to_radians();
        }
        if let Some(v) = layout.leaf_distance {
            config.layout.leaf_distance = v;
        }
        if let Some(v) = layout.leaf_spacing {
            config.layout.leaf_spacing = v;
        }
        if let Some(v) = layout.char_width_factor {
            if v > 0.0 {
                config.layout.char_width_factor = v;
            }
        }
        if let Some(v) = layout.label_line_height {
            config.layout.label_line_height = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v.max(1.0);
        }
        if let Some(v) = render.height {
            config.render.height = v.max(1.0);
        }
        if let Some(v) = render.font_family {
            config.render.font_family = v;
        }
        if let Some(v) = render.corner_radius {
            config.render.corner_radius = v;
        }
        if let Some(v) = render.shadow_offset {
            config.render.shadow_offset = v;
        }
        if let Some(v) = render.debug {
            config.render.debug = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.main_radius, 300.0);
        assert_eq!(config.render.width, PAGE_WIDTH);
        assert!(!config.render.debug);
    }

    #[test]
    fn overrides_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"layout": {{"mainRadius": 360, "fanSpreadDegrees": 90}}, "render": {{"debug": true}}}}"#
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout.main_radius, 360.0);
        assert!((config.layout.fan_spread - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(config.layout.branch_length, 230.0);
        assert!(config.render.debug);
    }

    #[test]
    fn accepts_json5_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{{\n  // tighter leaves\n  layout: {{ leafSpacing: 60, }},\n}}\n"
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout.leaf_spacing, 60.0);
    }

    #[test]
    fn reports_broken_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ layout: ").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
