#[doc(hidden)]
pub mod apply;
#[doc(hidden)]
pub mod paint;
#[doc(hidden)]
pub mod theme;

#[doc(inline)]
pub use paint::{CongestionRamp, LineColor, WidthProfile};
#[doc(inline)]
pub use theme::{Color, RouteTheme};
