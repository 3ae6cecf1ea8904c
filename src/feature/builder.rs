use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use itertools::Itertools;
use log::{debug, warn};

use crate::feature::{
    route_source_id, CONGESTION_KEY, INDEX_KEY, SOURCE_KEY, WAYPOINT_DESTINATION, WAYPOINT_KEY,
    WAYPOINT_ORIGIN, WAYPOINT_SOURCE_ID,
};
use crate::geo::decode_line;
use crate::route::{Route, RouteLeg, RouteStep};

/// Converts one route into its renderable collection: a whole-route
/// feature tagged with source and index, followed by the per-leg traffic
/// features. Returns the collection together with the decoded line, which
/// doubles as the route's registry entry for tap resolution.
///
/// A geometry that fails to decode degrades to an empty collection and an
/// empty registry line; the route simply does not render.
pub fn route_collection(route: &Route, index: usize) -> (FeatureCollection, LineString<f64>) {
    let line = match decode_line(&route.geometry) {
        Ok(line) => line,
        Err(err) => {
            warn!("Unable to decode geometry for route {index}: {err:?}");
            return (collection(Vec::new()), LineString::new(Vec::new()));
        }
    };

    let mut features = vec![route_feature(&line, index)];
    for leg in &route.legs {
        traffic_features(leg, index, &line, &mut features);
    }

    (collection(features), line)
}

/// Origin/destination markers for one route: the first and last step
/// maneuver location of every leg, tagged with their role.
pub fn waypoint_collection(route: &Route) -> FeatureCollection {
    let mut features = Vec::new();
    for leg in &route.legs {
        if let Some(first) = leg.steps.first() {
            features.push(waypoint_feature(first, WAYPOINT_ORIGIN));
        }
        if let Some(last) = leg.steps.last() {
            features.push(waypoint_feature(last, WAYPOINT_DESTINATION));
        }
    }
    collection(features)
}

fn route_feature(line: &LineString<f64>, index: usize) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert(SOURCE_KEY.to_string(), route_source_id(index).into());
    properties.insert(INDEX_KEY.to_string(), index.into());
    feature(Geometry::new(Value::from(line)), Some(properties))
}

fn traffic_features(
    leg: &RouteLeg,
    index: usize,
    line: &LineString<f64>,
    features: &mut Vec<Feature>,
) {
    let congestion = leg.annotation.as_ref().and_then(|a| a.congestion.as_deref());
    let Some(congestion) = congestion else {
        // Legs without congestion data render as a single untagged line.
        features.push(feature(Geometry::new(Value::from(line)), None));
        return;
    };

    // Guards against an upstream indexing mismatch between the annotation
    // and the decoded geometry. A mismatched leg emits no features.
    if congestion.len() + 1 > line.0.len() {
        debug!(
            "Skipping congestion features for a leg of route {index}: {} entries over {} points",
            congestion.len(),
            line.0.len()
        );
        return;
    }

    for ((start, end), level) in line.points().tuple_windows().zip(congestion) {
        let segment = LineString::from(vec![start, end]);

        let mut properties = JsonObject::new();
        properties.insert(CONGESTION_KEY.to_string(), level.to_string().into());
        properties.insert(SOURCE_KEY.to_string(), route_source_id(index).into());
        properties.insert(INDEX_KEY.to_string(), index.into());

        features.push(feature(
            Geometry::new(Value::from(&segment)),
            Some(properties),
        ));
    }
}

fn waypoint_feature(step: &RouteStep, role: &str) -> Feature {
    let [lng, lat] = step.maneuver.location;

    let mut properties = JsonObject::new();
    properties.insert(SOURCE_KEY.to_string(), WAYPOINT_SOURCE_ID.into());
    properties.insert(WAYPOINT_KEY.to_string(), role.into());

    feature(
        Geometry::new(Value::Point(vec![lng, lat])),
        Some(properties),
    )
}

fn feature(geometry: Geometry, properties: Option<JsonObject>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties,
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
