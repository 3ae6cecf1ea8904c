#![doc = include_str!("../README.md")]

pub mod feature;
pub mod geo;
pub mod host;
pub mod overlay;
pub mod route;
pub mod style;
pub mod util;

pub use host::{MapStyle, NavigationHost};
pub use overlay::RouteOverlay;
pub use route::{Congestion, LegAnnotation, Route, RouteLeg, RouteStep, StepManeuver};
pub use style::RouteTheme;

use crate::geo::GeoError;
use crate::overlay::OverlayError;

/// Crate-wide error, folding the module errors together. Only invalid
/// input surfaces through the public API; everything else degrades in
/// place (see the module docs).
#[derive(Debug)]
pub enum Error {
    Geo(GeoError),
    Overlay(OverlayError),
}

pub type Result<T> = std::result::Result<T, Error>;

crate::impl_err!(GeoError, Geo);
crate::impl_err!(OverlayError, Overlay);
