//! Longitude/latitude positions, validation and antimeridian handling.
//!
//! Positions are always (longitude, latitude) in decimal degrees, matching the
//! GeoJSON axis order. Validation rejects non-finite and out-of-range values;
//! accepted longitudes are normalised into `(-180, 180]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Longitude/latitude pair in decimal degrees.
///
/// Serialises as a `[longitude, latitude]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

impl Position {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Validate this position and normalise its longitude.
    pub fn validated(self) -> Result<Self> {
        validate_position(self)
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Position) -> f64 {
        great_circle_km(*self, *other)
    }
}

impl From<[f64; 2]> for Position {
    fn from(value: [f64; 2]) -> Self {
        Position::new(value[0], value[1])
    }
}

impl From<Position> for [f64; 2] {
    fn from(value: Position) -> Self {
        [value.longitude, value.latitude]
    }
}

impl From<(f64, f64)> for Position {
    fn from(value: (f64, f64)) -> Self {
        Position::new(value.0, value.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// Reject non-finite or out-of-range coordinates and normalise the longitude.
pub fn validate_position(position: Position) -> Result<Position> {
    let Position {
        longitude,
        latitude,
    } = position;

    let invalid = |reason: &str| Error::InvalidCoordinate {
        longitude,
        latitude,
        reason: reason.to_string(),
    };

    if !longitude.is_finite() || !latitude.is_finite() {
        return Err(invalid("coordinates must be finite numbers"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid("longitude must be within [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(invalid("latitude must be within [-90, 90]"));
    }

    Ok(Position::new(normalize_longitude(longitude), latitude))
}

/// Reduce a longitude modulo 360 into `(-180, 180]`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let reduced = longitude.rem_euclid(360.0);
    if reduced > 180.0 {
        reduced - 360.0
    } else {
        reduced
    }
}

/// Whether the straight longitude difference between two points exceeds 180°.
pub fn spans_antimeridian(origin: Position, destination: Position) -> bool {
    (destination.longitude - origin.longitude).abs() > 180.0
}

/// Rewrite `destination` so its longitude is within 180° of `origin`.
///
/// The returned longitude may lie outside `[-180, 180]`; it is meant only as a
/// search input and never ends up in route output.
pub fn adjust_antimeridian_pair(origin: Position, destination: Position) -> Position {
    let delta = destination.longitude - origin.longitude;
    let longitude = if delta > 180.0 {
        destination.longitude - 360.0
    } else if delta < -180.0 {
        destination.longitude + 360.0
    } else {
        destination.longitude
    };
    Position::new(longitude, destination.latitude)
}

/// Haversine great-circle distance in kilometres.
pub fn great_circle_km(from: Position, to: Position) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Haversine great-circle distance in metres.
pub fn great_circle_m(from: Position, to: Position) -> f64 {
    great_circle_km(from, to) * 1000.0
}

/// Cartesian coordinates of a position on the unit sphere.
pub(crate) fn unit_vector(position: Position) -> [f64; 3] {
    let lon = position.longitude.to_radians();
    let lat = position.latitude.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}
