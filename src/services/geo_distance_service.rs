use geo::{Distance, Geodesic};

use crate::entities::GeoPoint;

/// Geodesic (WGS-84 ellipsoid) distances between points.
pub struct GeoDistanceService;

impl GeoDistanceService {
    pub fn meters(from: GeoPoint, to: GeoPoint) -> f64 {
        Geodesic::distance(geo::Point::from(from), geo::Point::from(to))
    }

    /// Distance floored to whole meters.
    pub fn whole_meters(from: GeoPoint, to: GeoPoint) -> i64 {
        Self::meters(from, to).floor() as i64
    }
}
