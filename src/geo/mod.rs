use geo::{Closest, ClosestPoint, LineString, Point};

#[doc(hidden)]
pub mod error;

#[doc(inline)]
pub use error::GeoError;

/// Precision of encoded polylines supplied by the routing data source.
pub const POLYLINE_PRECISION: u32 = 6;

/// Decodes an encoded route geometry into a `LineString`.
///
/// Every decode in the crate goes through here, at one fixed precision, so
/// point sequences derived from the same route stay identical wherever
/// they are compared or reused.
pub fn decode_line(geometry: &str) -> Result<LineString<f64>, GeoError> {
    polyline::decode_polyline(geometry, POLYLINE_PRECISION)
        .map_err(|err| GeoError::InvalidPolyline(err.to_string()))
}

/// Projects `target` onto `line`, yielding the nearest point on the line.
///
/// `None` means the projection was indeterminate (an empty line); callers
/// treat that as "no answer", not as an error.
pub fn nearest_point_on(line: &LineString<f64>, target: Point<f64>) -> Option<Point<f64>> {
    match line.closest_point(&target) {
        Closest::Intersection(point) | Closest::SinglePoint(point) => Some(point),
        Closest::Indeterminate => None,
    }
}
