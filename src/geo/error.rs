#[derive(Debug)]
pub enum GeoError {
    /// The encoded geometry could not be decoded at the expected precision.
    InvalidPolyline(String),
}
