#[doc(hidden)]
pub mod congestion;
#[doc(hidden)]
pub mod entity;

#[doc(inline)]
pub use congestion::Congestion;
#[doc(inline)]
pub use entity::{LegAnnotation, Route, RouteLeg, RouteStep, StepManeuver};
