//! Eight-point compass labels for wind directions.

const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Compass point for a meteorological direction in degrees.
///
/// Each point covers 45°, centred on its bearing, so north spans
/// [337.5, 22.5).
///
/// # Example
/// ```
/// use tide_seat_lib::compass::label;
///
/// assert_eq!(label(0), "N");
/// assert_eq!(label(45), "NE");
/// assert_eq!(label(250), "W");
/// ```
pub fn label(direction: u16) -> &'static str {
    let shifted = (direction as f64 + 22.5).rem_euclid(360.0);
    POINTS[(shifted / 45.0).floor() as usize % POINTS.len()]
}
