use geo::Point;
use serde::{Deserialize, Serialize};

use crate::route::Congestion;

/// A candidate path between an origin and a destination, as supplied by
/// the routing data source.
///
/// Geometry is an encoded polyline at fixed precision, decoded through
/// [`crate::geo::decode_line`] so point sequences stay comparable wherever
/// they are reused. A route's identity within an overlay is positional:
/// its index in the active route list decides whether it is styled as
/// primary or alternative.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub geometry: String,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

impl Route {
    pub fn new(geometry: impl Into<String>, legs: Vec<RouteLeg>) -> Self {
        Route {
            geometry: geometry.into(),
            legs,
            ..Default::default()
        }
    }
}

/// A section of a route between two waypoints. Congestion annotations,
/// when present, carry one entry per gap between adjacent geometry points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<RouteStep>,
    #[serde(default)]
    pub annotation: Option<LegAnnotation>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub maneuver: StepManeuver,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// The location a step's maneuver happens at, `[longitude, latitude]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepManeuver {
    pub location: [f64; 2],
}

impl StepManeuver {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.location[0], self.location[1])
    }
}

/// Per-segment metadata a directions service attaches to a leg.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegAnnotation {
    #[serde(default)]
    pub congestion: Option<Vec<Congestion>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_directions_response_shape() {
        let raw = r#"{
            "geometry": "_p~iF~ps|U_ulLnnqC",
            "distance": 1204.5,
            "duration": 301.0,
            "legs": [{
                "summary": "High Street",
                "annotation": { "congestion": ["low", "severe"] },
                "steps": [
                    { "maneuver": { "location": [174.76, -36.85] }, "distance": 600.0 },
                    { "maneuver": { "location": [174.77, -36.86] }, "distance": 604.5 }
                ]
            }]
        }"#;

        let route: Route = serde_json::from_str(raw).expect("deserialises");
        assert_eq!(route.legs.len(), 1);

        let leg = &route.legs[0];
        assert_eq!(leg.steps.len(), 2);
        assert_eq!(
            leg.annotation.as_ref().and_then(|a| a.congestion.clone()),
            Some(vec![Congestion::Low, Congestion::Severe])
        );

        let origin = leg.steps[0].maneuver.point();
        assert_eq!(origin.x_y(), (174.76, -36.85));
    }
}
