//! Commits route styling to a [`MapStyle`] host: layer construction for
//! the draw path, colour re-matching for the restyle path, visibility
//! toggling, and below-anchor resolution.

use log::debug;

use crate::feature;
use crate::host::{
    IconMapping, LayerKind, LineCap, LineJoin, LineLayer, MapStyle, PitchAlignment, SymbolLayer,
};
use crate::style::paint::{LineColor, WidthProfile};
use crate::style::theme::RouteTheme;

/// Id fragment marking a host's user-location layers; these are never
/// eligible as the below-anchor.
pub const LOCATION_LAYER_HINT: &str = "location";

/// Builds the foreground line layer for the route at `index`.
pub fn route_line_layer(theme: &RouteTheme, index: usize, primary: bool) -> LineLayer {
    LineLayer {
        id: feature::route_layer_id(index),
        source: feature::route_source_id(index),
        color: LineColor::Congestion(theme.ramp(primary)),
        width: WidthProfile::route(theme.scale(primary)),
        cap: LineCap::Round,
        join: LineJoin::Round,
    }
}

/// Builds the wider shield underlay rendered beneath the foreground line.
pub fn route_shield_layer(theme: &RouteTheme, index: usize, primary: bool) -> LineLayer {
    LineLayer {
        id: feature::route_shield_layer_id(index),
        source: feature::route_source_id(index),
        color: LineColor::Solid(theme.shield_color(primary)),
        width: WidthProfile::shield(theme.scale(primary)),
        cap: LineCap::Round,
        join: LineJoin::Round,
    }
}

/// Builds the waypoint marker layer, matching icons on each feature's
/// waypoint role.
pub fn waypoint_layer(theme: &RouteTheme) -> SymbolLayer {
    SymbolLayer {
        id: feature::WAYPOINT_LAYER_ID.to_string(),
        source: feature::WAYPOINT_SOURCE_ID.to_string(),
        icon_image: IconMapping {
            fallback: theme.origin_icon.clone(),
            origin: theme.origin_icon.clone(),
            destination: theme.destination_icon.clone(),
        },
        icon_size: WidthProfile::icon(),
        icon_allow_overlap: true,
        icon_ignore_placement: true,
        icon_pitch_alignment: PitchAlignment::Map,
    }
}

/// Re-applies role colours to an existing route's layer pair. A route
/// promoted to primary additionally has its shield and line re-inserted
/// immediately below the waypoint layer, so it renders above the
/// alternates regardless of creation order. Missing layers are skipped.
pub fn restyle_route<M: MapStyle>(map: &mut M, theme: &RouteTheme, index: usize, primary_index: usize) {
    let primary = index == primary_index;

    let shield_id = feature::route_shield_layer_id(index);
    if map.set_line_color(&shield_id, LineColor::Solid(theme.shield_color(primary))) {
        if primary {
            map.move_layer_below(&shield_id, feature::WAYPOINT_LAYER_ID);
        }
    } else {
        debug!("Restyle targeted missing layer {shield_id}");
    }

    let line_id = feature::route_layer_id(index);
    if map.set_line_color(&line_id, LineColor::Congestion(theme.ramp(primary))) {
        if primary {
            map.move_layer_below(&line_id, feature::WAYPOINT_LAYER_ID);
        }
    } else {
        debug!("Restyle targeted missing layer {line_id}");
    }
}

/// Hides or shows every recorded layer that neither belongs to the
/// primary route nor is the waypoint layer.
pub fn toggle_alternatives<M: MapStyle>(
    map: &mut M,
    layer_ids: &[String],
    primary_index: usize,
    visible: bool,
) {
    for id in layer_ids {
        if feature::references_index(id, primary_index) || id == feature::WAYPOINT_LAYER_ID {
            continue;
        }
        map.set_visibility(id, visible);
    }
}

/// Resolves the layer the route stack is inserted below: a non-symbol
/// layer that is not part of the user-location indicator. The scan walks
/// the whole stack bottom to top and keeps overwriting its candidate, so
/// the topmost eligible layer wins.
pub fn locate_below_anchor<M: MapStyle>(map: &M) -> Option<String> {
    let mut anchor = None;
    for layer in map.layers() {
        if layer.kind != LayerKind::Symbol && !layer.id.contains(LOCATION_LAYER_HINT) {
            anchor = Some(layer.id);
        }
    }
    anchor
}
