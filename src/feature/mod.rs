//! Conversion of routes into renderable feature collections, and the
//! tagging scheme the style layers match against. The property keys and
//! id formats here are the crate's only wire format: they must stay
//! consistent between the builder and the layer expressions.

#[doc(hidden)]
pub mod builder;
#[doc(hidden)]
pub(crate) mod job;
#[cfg(test)]
mod test;

#[doc(inline)]
pub use builder::{route_collection, waypoint_collection};

/// Property carrying the id of the source a feature belongs to.
pub const SOURCE_KEY: &str = "source";
/// Property carrying the owning route's index.
pub const INDEX_KEY: &str = "index";
/// Property carrying a segment's congestion level.
pub const CONGESTION_KEY: &str = "congestion";
/// Property carrying a waypoint feature's role.
pub const WAYPOINT_KEY: &str = "waypoint";

pub const WAYPOINT_ORIGIN: &str = "origin";
pub const WAYPOINT_DESTINATION: &str = "destination";

/// Shared source/layer pair for the primary route's waypoint markers.
pub const WAYPOINT_SOURCE_ID: &str = "route-waypoint-source";
pub const WAYPOINT_LAYER_ID: &str = "route-waypoint-layer";

pub fn route_source_id(index: usize) -> String {
    format!("route-source-{index}")
}

pub fn route_layer_id(index: usize) -> String {
    format!("route-line-{index}")
}

pub fn route_shield_layer_id(index: usize) -> String {
    format!("route-shield-{index}")
}

/// Whether a layer id belongs to the route at `index`.
pub fn references_index(layer_id: &str, index: usize) -> bool {
    layer_id
        .rsplit_once('-')
        .and_then(|(_, tail)| tail.parse::<usize>().ok())
        .is_some_and(|parsed| parsed == index)
}
