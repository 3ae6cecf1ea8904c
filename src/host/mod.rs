//! Contracts for the collaborators the overlay drives but does not own:
//! the map rendering host's style surface and the navigation session.

use geojson::FeatureCollection;

use crate::style::paint::{LineColor, WidthProfile};

/// Kind of a style layer, as reported by the host. The below-anchor scan
/// only cares whether a layer is a symbol layer; the remaining kinds are
/// carried so hosts can report their stack faithfully.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LayerKind {
    Background,
    Fill,
    Line,
    Raster,
    Symbol,
}

/// One entry of the host's layer stack.
#[derive(Clone, Debug)]
pub struct LayerInfo {
    pub id: String,
    pub kind: LayerKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineJoin {
    Bevel,
    Round,
    Miter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PitchAlignment {
    Map,
    Viewport,
    Auto,
}

/// A line layer to be committed to the style, fed by a geojson source.
#[derive(Clone, Debug)]
pub struct LineLayer {
    pub id: String,
    pub source: String,
    pub color: LineColor,
    pub width: WidthProfile,
    pub cap: LineCap,
    pub join: LineJoin,
}

/// Icon name per waypoint role, matched against each feature's waypoint
/// property; features without one use the fallback.
#[derive(Clone, Debug)]
pub struct IconMapping {
    pub fallback: String,
    pub origin: String,
    pub destination: String,
}

/// A symbol layer for waypoint markers.
#[derive(Clone, Debug)]
pub struct SymbolLayer {
    pub id: String,
    pub source: String,
    pub icon_image: IconMapping,
    pub icon_size: WidthProfile,
    pub icon_allow_overlap: bool,
    pub icon_ignore_placement: bool,
    pub icon_pitch_alignment: PitchAlignment,
}

#[derive(Clone, Debug)]
pub enum LayerSpec {
    Line(LineLayer),
    Symbol(SymbolLayer),
}

impl LayerSpec {
    pub fn id(&self) -> &str {
        match self {
            LayerSpec::Line(layer) => &layer.id,
            LayerSpec::Symbol(layer) => &layer.id,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerSpec::Line(_) => LayerKind::Line,
            LayerSpec::Symbol(_) => LayerKind::Symbol,
        }
    }
}

/// Style surface of the map rendering host.
///
/// All calls mutate the style on the caller's thread; the overlay only
/// invokes them from whichever thread owns it. Operations targeting a
/// layer id that is not currently present return `false` and otherwise do
/// nothing, so an external style mutation degrades rather than fails.
pub trait MapStyle {
    /// The current layer stack, ordered bottom to top.
    fn layers(&self) -> Vec<LayerInfo>;

    fn has_layer(&self, id: &str) -> bool {
        self.layers().iter().any(|layer| layer.id == id)
    }

    /// Adds a layer, below the given layer id when one is supplied and
    /// present, otherwise on top of the stack.
    fn add_layer(&mut self, layer: LayerSpec, below: Option<&str>);

    /// Re-inserts an existing layer immediately below another,
    /// preserving the layer's paint as created.
    fn move_layer_below(&mut self, id: &str, below: &str) -> bool;

    fn remove_layer(&mut self, id: &str) -> bool;

    /// Creates or replaces a geojson source.
    fn upsert_geojson_source(&mut self, id: &str, data: FeatureCollection);

    fn set_line_color(&mut self, id: &str, color: LineColor) -> bool;

    fn set_visibility(&mut self, id: &str, visible: bool) -> bool;
}

/// Navigation session host. The overlay registers interest in progress
/// updates across the owning application's lifecycle via
/// [`crate::RouteOverlay::attach`] / [`crate::RouteOverlay::detach`]; the
/// session then feeds updates to
/// [`crate::RouteOverlay::on_progress_update`].
pub trait NavigationHost {
    fn add_progress_listener(&mut self);
    fn remove_progress_listener(&mut self);
}
