use crate::route::Congestion;
use crate::style::theme::Color;

/// Exponent shared by every zoom interpolation in the route styling.
pub const INTERPOLATION_BASE: f64 = 1.5;

// Zoom stops for the foreground route line, the wider shield underlay
// beneath it, and the waypoint icon size. Shield widths hold a fixed
// minimum at the lowest zoom regardless of the route's scale factor.
const ROUTE_WIDTH_STOPS: [(f64, f64); 6] = [
    (4.0, 3.0),
    (10.0, 4.0),
    (13.0, 6.0),
    (16.0, 10.0),
    (19.0, 14.0),
    (22.0, 18.0),
];
const SHIELD_WIDTH_STOPS: [(f64, f64); 5] = [
    (10.0, 7.0),
    (14.0, 10.5),
    (16.5, 15.5),
    (19.0, 24.0),
    (22.0, 29.0),
];
const ICON_SIZE_STOPS: [(f64, f64); 4] = [(0.0, 0.6), (10.0, 0.8), (12.0, 1.3), (22.0, 2.8)];

/// Zoom-interpolated line width: exponential interpolation across fixed
/// `(zoom, width)` stops, clamped to the outermost stops.
#[derive(Clone, Debug, PartialEq)]
pub struct WidthProfile {
    pub base: f64,
    pub stops: Vec<(f64, f64)>,
}

impl WidthProfile {
    /// Foreground line widths, scaled by the route's role scale factor.
    pub fn route(scale: f64) -> Self {
        WidthProfile {
            base: INTERPOLATION_BASE,
            stops: ROUTE_WIDTH_STOPS
                .iter()
                .map(|(zoom, width)| (*zoom, width * scale))
                .collect(),
        }
    }

    /// Shield underlay widths. The lowest-zoom stop is a fixed minimum
    /// and is not scaled.
    pub fn shield(scale: f64) -> Self {
        WidthProfile {
            base: INTERPOLATION_BASE,
            stops: SHIELD_WIDTH_STOPS
                .iter()
                .enumerate()
                .map(|(position, (zoom, width))| {
                    (*zoom, if position == 0 { *width } else { width * scale })
                })
                .collect(),
        }
    }

    /// Waypoint icon size by zoom.
    pub fn icon() -> Self {
        WidthProfile {
            base: INTERPOLATION_BASE,
            stops: ICON_SIZE_STOPS.to_vec(),
        }
    }

    /// Evaluates the profile at `zoom`.
    pub fn width_at(&self, zoom: f64) -> f64 {
        let Some((first, last)) = self.stops.first().zip(self.stops.last()) else {
            return 0.0;
        };
        if zoom <= first.0 {
            return first.1;
        }
        if zoom >= last.0 {
            return last.1;
        }

        for pair in self.stops.windows(2) {
            let [(zoom_a, width_a), (zoom_b, width_b)] = pair else {
                continue;
            };
            if zoom < *zoom_b {
                let range = self.base.powf(zoom_b - zoom_a) - 1.0;
                let progress = self.base.powf(zoom - zoom_a) - 1.0;
                return width_a + (width_b - width_a) * (progress / range);
            }
        }

        last.1
    }
}

/// Four-way categorical colour mapping keyed by a feature's congestion
/// tag. Heavy and severe congestion share the severe colour; untagged and
/// free-flowing segments fall through to the default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CongestionRamp {
    pub default: Color,
    pub moderate: Color,
    pub severe: Color,
}

impl CongestionRamp {
    pub fn color_for(&self, congestion: Option<Congestion>) -> Color {
        match congestion {
            Some(Congestion::Moderate) => self.moderate,
            Some(Congestion::Heavy) | Some(Congestion::Severe) => self.severe,
            _ => self.default,
        }
    }
}

/// Paint for a line layer: one solid colour, or a categorical match over
/// each feature's congestion property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineColor {
    Solid(Color),
    Congestion(CongestionRamp),
}

impl LineColor {
    pub fn resolve(&self, congestion: Option<Congestion>) -> Color {
        match self {
            LineColor::Solid(color) => *color,
            LineColor::Congestion(ramp) => ramp.color_for(congestion),
        }
    }
}
