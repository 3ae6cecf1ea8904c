use geo::{Distance, Haversine, LineString, Point};

use crate::geo::nearest_point_on;

/// Registry entry for one drawn route. Entries live in a slot arena
/// parallel to the route list: slot index equals route index, rebuilt
/// atomically with every route-set change.
#[derive(Clone, Debug)]
pub(crate) struct RouteSlot {
    pub line: LineString<f64>,
}

/// Finds the registered route nearest to a tap: projects the tap onto
/// every registered line and ranks by haversine distance to the
/// projection. Any indeterminate projection aborts the whole resolution;
/// the tap is treated as invalid, not as an error. On an exact distance
/// tie the lowest slot wins (implementation-defined).
pub(crate) fn nearest_route(click: Point<f64>, slots: &[RouteSlot]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (slot, entry) in slots.iter().enumerate() {
        let projected = nearest_point_on(&entry.line, click)?;
        let distance = Haversine.distance(click, projected);

        if best.map(|(_, nearest)| distance < nearest).unwrap_or(true) {
            best = Some((slot, distance));
        }
    }

    best.map(|(slot, _)| slot)
}
