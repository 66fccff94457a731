//! Coordinate and point-of-interest types.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
///
/// # Examples
///
/// ```
/// use road_tsp::models::Coord;
///
/// let plaza = Coord::new(4.5981, -74.0760);
/// assert!(plaza.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Coord {
    /// Creates a coordinate from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A location to be visited by a tour, distinct from ordinary road
/// intersections.
///
/// Points of interest arrive from an external source (the caller parses
/// them out of a point list) and are bound to a concrete network node by
/// [`Integrator`](crate::integration::Integrator).
///
/// # Examples
///
/// ```
/// use road_tsp::models::{Coord, PointOfInterest};
///
/// let poi = PointOfInterest::new(7, "Museo del Oro", Coord::new(4.6018, -74.0722));
/// assert_eq!(poi.id(), 7);
/// assert_eq!(poi.name(), "Museo del Oro");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    id: u64,
    name: String,
    coord: Coord,
}

impl PointOfInterest {
    /// Creates a point of interest with a stable external id.
    pub fn new(id: u64, name: impl Into<String>, coord: Coord) -> Self {
        Self {
            id,
            name: name.into(),
            coord,
        }
    }

    /// Stable external identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw coordinate, before any snapping to the network.
    pub fn coord(&self) -> Coord {
        self.coord
    }
}
