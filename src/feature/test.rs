use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use approx::assert_relative_eq;
use geo::{line_string, LineString};
use geojson::Value;

use crate::feature::builder::{route_collection, waypoint_collection};
use crate::feature::job::FeatureJob;
use crate::feature::{
    references_index, route_layer_id, route_shield_layer_id, route_source_id, CONGESTION_KEY,
    INDEX_KEY, SOURCE_KEY, WAYPOINT_DESTINATION, WAYPOINT_KEY, WAYPOINT_LAYER_ID, WAYPOINT_ORIGIN,
};
use crate::geo::{decode_line, POLYLINE_PRECISION};
use crate::route::{Congestion, LegAnnotation, Route, RouteLeg, RouteStep, StepManeuver};

fn encoded(line: &LineString<f64>) -> String {
    polyline::encode_coordinates(line.clone(), POLYLINE_PRECISION).expect("encodes")
}

fn three_point_line() -> LineString<f64> {
    line_string![
        (x: 174.763336, y: -36.848461),
        (x: 174.765504, y: -36.849672),
        (x: 174.768148, y: -36.851892),
    ]
}

fn leg(congestion: Option<Vec<Congestion>>) -> RouteLeg {
    RouteLeg {
        annotation: congestion.map(|congestion| LegAnnotation {
            congestion: Some(congestion),
        }),
        ..Default::default()
    }
}

fn step(lng: f64, lat: f64) -> RouteStep {
    RouteStep {
        maneuver: StepManeuver {
            location: [lng, lat],
        },
        ..Default::default()
    }
}

#[test]
fn ids_reference_their_own_index_only() {
    assert!(references_index(&route_layer_id(4), 4));
    assert!(references_index(&route_shield_layer_id(0), 0));
    assert!(!references_index(&route_layer_id(11), 1));
    assert!(!references_index(WAYPOINT_LAYER_ID, 0));
}

#[test]
fn legs_without_congestion_emit_one_feature_each() {
    let route = Route::new(encoded(&three_point_line()), vec![leg(None), leg(None)]);
    let (collection, _) = route_collection(&route, 0);

    // One whole-route feature plus one untagged feature per leg.
    assert_eq!(collection.features.len(), 3);

    let tagged = collection
        .features
        .iter()
        .filter(|feature| feature.property(CONGESTION_KEY).is_some())
        .count();
    assert_eq!(tagged, 0);

    let untagged = collection
        .features
        .iter()
        .filter(|feature| feature.properties.is_none())
        .count();
    assert_eq!(untagged, 2);
}

#[test]
fn annotated_leg_emits_one_feature_per_segment() {
    let route = Route::new(
        encoded(&three_point_line()),
        vec![leg(Some(vec![Congestion::Low, Congestion::Severe]))],
    );
    let (collection, line) = route_collection(&route, 3);

    let segments: Vec<_> = collection
        .features
        .iter()
        .filter(|feature| feature.property(CONGESTION_KEY).is_some())
        .collect();
    assert_eq!(segments.len(), 2);

    for (position, segment) in segments.iter().enumerate() {
        assert_eq!(
            segment.property(SOURCE_KEY).and_then(|v| v.as_str()),
            Some(route_source_id(3).as_str())
        );
        assert_eq!(
            segment.property(INDEX_KEY).and_then(|v| v.as_u64()),
            Some(3)
        );

        let Some(Value::LineString(coordinates)) =
            segment.geometry.as_ref().map(|geometry| &geometry.value)
        else {
            panic!("congestion feature should carry a line");
        };
        assert_eq!(coordinates.len(), 2);
        assert_relative_eq!(coordinates[0][0], line.0[position].x, epsilon = 1e-6);
        assert_relative_eq!(coordinates[0][1], line.0[position].y, epsilon = 1e-6);
    }

    assert_eq!(
        segments[0].property(CONGESTION_KEY).and_then(|v| v.as_str()),
        Some("low")
    );
    assert_eq!(
        segments[1].property(CONGESTION_KEY).and_then(|v| v.as_str()),
        Some("severe")
    );
}

#[test]
fn oversized_annotation_emits_nothing_for_the_leg() {
    // Three congestion entries over a three point line violates the
    // entries + 1 <= points guard.
    let route = Route::new(
        encoded(&three_point_line()),
        vec![leg(Some(vec![
            Congestion::Low,
            Congestion::Low,
            Congestion::Low,
        ]))],
    );
    let (collection, _) = route_collection(&route, 0);

    // Only the whole-route feature survives.
    assert_eq!(collection.features.len(), 1);
    assert!(collection.features[0].property(INDEX_KEY).is_some());
}

#[test]
fn empty_annotation_is_not_the_untagged_fallback() {
    let route = Route::new(encoded(&three_point_line()), vec![leg(Some(vec![]))]);
    let (collection, _) = route_collection(&route, 0);
    assert_eq!(collection.features.len(), 1);
}

#[test]
fn registry_line_matches_the_decoded_geometry() {
    let geometry = encoded(&three_point_line());
    let route = Route::new(geometry.clone(), vec![leg(None)]);

    let (_, line) = route_collection(&route, 0);
    assert_eq!(line, decode_line(&geometry).expect("decodes"));
}

#[test]
fn undecodable_geometry_degrades_to_an_empty_collection() {
    let route = Route::new("_", vec![leg(None)]);
    let (collection, line) = route_collection(&route, 0);

    assert!(collection.features.is_empty());
    assert!(line.0.is_empty());
}

#[test]
fn waypoints_tag_first_and_last_step_of_each_leg() {
    let mut first = leg(None);
    first.steps = vec![step(0.0, 0.0), step(1.0, 1.0), step(2.0, 2.0)];
    let mut second = leg(None);
    second.steps = vec![step(2.0, 2.0), step(3.0, 3.0)];

    let route = Route::new(encoded(&three_point_line()), vec![first, second]);
    let collection = waypoint_collection(&route);

    let roles: Vec<_> = collection
        .features
        .iter()
        .filter_map(|feature| feature.property(WAYPOINT_KEY).and_then(|v| v.as_str()))
        .collect();
    assert_eq!(
        roles,
        vec![
            WAYPOINT_ORIGIN,
            WAYPOINT_DESTINATION,
            WAYPOINT_ORIGIN,
            WAYPOINT_DESTINATION
        ]
    );

    let Some(Value::Point(origin)) = collection.features[0]
        .geometry
        .as_ref()
        .map(|geometry| &geometry.value)
    else {
        panic!("waypoint features should carry points");
    };
    assert_eq!(origin, &vec![0.0, 0.0]);

    // The second leg's destination is its last step.
    let Some(Value::Point(destination)) = collection.features[3]
        .geometry
        .as_ref()
        .map(|geometry| &geometry.value)
    else {
        panic!("waypoint features should carry points");
    };
    assert_eq!(destination, &vec![3.0, 3.0]);
}

#[test]
fn single_step_leg_reuses_the_step_for_both_roles() {
    let mut only = leg(None);
    only.steps = vec![step(5.0, 5.0)];

    let route = Route::new(encoded(&three_point_line()), vec![only]);
    let collection = waypoint_collection(&route);

    assert_eq!(collection.features.len(), 2);
    assert_eq!(
        collection.features[0].geometry, collection.features[1].geometry
    );
}

#[test_log::test]
fn job_publishes_collections_in_slot_order() {
    let live = Arc::new(AtomicU64::new(7));
    let routes = vec![
        Route::new(encoded(&three_point_line()), vec![leg(None)]),
        Route::new(
            encoded(&line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]),
            vec![leg(None)],
        ),
    ];

    let job = FeatureJob::spawn(routes.clone(), 7, live);
    let built = job.complete().expect("publishes");

    assert_eq!(built.generation, 7);
    assert_eq!(built.collections.len(), 2);
    assert_eq!(
        built.lines[1],
        decode_line(&routes[1].geometry).expect("decodes")
    );
}

#[test_log::test]
fn superseded_job_never_publishes() {
    let live = Arc::new(AtomicU64::new(3));
    let route = Route::new(encoded(&three_point_line()), vec![leg(None)]);

    // Spawned under generation 2 while the live generation is already 3.
    let job = FeatureJob::spawn(vec![route], 2, live);
    assert!(job.complete().is_none());
}
