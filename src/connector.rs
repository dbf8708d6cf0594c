use serde::Serialize;

/// Control point distance from the chord midpoint, as a fraction of the chord length.
pub const CURVATURE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Straight,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connector {
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
    Quadratic {
        from: (f32, f32),
        control: (f32, f32),
        to: (f32, f32),
    },
}

impl Connector {
    pub fn between(from: (f32, f32), to: (f32, f32), kind: ConnectorKind) -> Self {
        match kind {
            ConnectorKind::Straight => Self::Line { from, to },
            ConnectorKind::Curved => Self::Quadratic {
                from,
                control: control_point(from, to, CURVATURE),
                to,
            },
        }
    }

    pub fn path_data(&self) -> String {
        match *self {
            Self::Line { from, to } => format!(
                "M {:.2} {:.2} L {:.2} {:.2}",
                from.0, from.1, to.0, to.1
            ),
            Self::Quadratic { from, control, to } => format!(
                "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
                from.0, from.1, control.0, control.1, to.0, to.1
            ),
        }
    }
}

/// Midpoint of the chord pushed along its left-hand normal by `curvature * length`.
/// Coincident endpoints have no normal; the control point is then the midpoint itself.
pub fn control_point(from: (f32, f32), to: (f32, f32), curvature: f32) -> (f32, f32) {
    let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return mid;
    }
    let (ux, uy) = (dx / length, dy / length);
    let (px, py) = (-uy, ux);
    let offset = length * curvature;
    (mid.0 + px * offset, mid.1 + py * offset)
}

pub fn connection_svg(connector: &Connector, color: &str, stroke_width: f32) -> String {
    format!(
        "<path class=\"connector\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
        connector.path_data(),
        color,
        stroke_width
    )
}
