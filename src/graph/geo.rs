//! Geodesic helpers: haversine distance and point-to-segment projection.

use crate::models::Coord;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// # Examples
///
/// ```
/// use road_tsp::graph::haversine_m;
/// use road_tsp::models::Coord;
///
/// let a = Coord::new(4.6000, -74.0800);
/// let b = Coord::new(4.6000, -74.0800);
/// assert!(haversine_m(a, b) < 1e-9);
///
/// // One degree of latitude is roughly 111 km.
/// let c = Coord::new(5.6000, -74.0800);
/// let d = haversine_m(a, c);
/// assert!((d - 111_195.0).abs() < 100.0);
/// ```
pub fn haversine_m(a: Coord, b: Coord) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// The foot of a point's perpendicular projection onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Projected coordinate, clamped to the segment.
    pub coord: Coord,
    /// Position along the segment in `[0, 1]` (0 = first endpoint).
    pub fraction: f64,
    /// Separation between the point and its projection, in degrees.
    pub separation_deg: f64,
}

/// Projects `p` onto the segment `a`–`b` in planar degree space.
///
/// The projection foot is clamped to the segment endpoints when the true
/// perpendicular foot falls outside it. Degenerate zero-length segments
/// project onto `a` with fraction 0.
pub fn project_onto_segment(p: Coord, a: Coord, b: Coord) -> Projection {
    let dx = b.lon - a.lon;
    let dy = b.lat - a.lat;
    let len_sq = dx * dx + dy * dy;

    let fraction = if len_sq > 0.0 {
        (((p.lon - a.lon) * dx + (p.lat - a.lat) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let coord = Coord::new(a.lat + fraction * dy, a.lon + fraction * dx);
    let sep_lat = p.lat - coord.lat;
    let sep_lon = p.lon - coord.lon;

    Projection {
        coord,
        fraction,
        separation_deg: (sep_lat * sep_lat + sep_lon * sep_lon).sqrt(),
    }
}
