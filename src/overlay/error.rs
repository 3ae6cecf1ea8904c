#[derive(Debug)]
pub enum OverlayError {
    /// `add_routes` requires at least one route; the first is primary.
    EmptyRouteSet,
}
