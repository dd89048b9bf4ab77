use serde::{Deserialize, Serialize};

use super::Cartesian;
use crate::ellipsoid::Ellipsoid;

/// A position in geodetic coordinates.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct GeodeticPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Height above the ellipsoid, in the ellipsoid's length unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl GeodeticPoint {
    /// Marks a Cartesian conversion that did not converge. Compare with
    /// [`is_sentinel`](Self::is_sentinel) before using a converted point.
    pub const SENTINEL: Self = Self {
        lat: -999.0,
        lon: -999.0,
        height: Some(-999.0),
    };

    /// Creates a point on the ellipsoid surface with no height.
    pub fn new(lat: f64, lon: f64) -> Self {
        GeodeticPoint {
            lat,
            lon,
            height: None,
        }
    }

    pub fn with_height(lat: f64, lon: f64, height: f64) -> Self {
        GeodeticPoint {
            lat,
            lon,
            height: Some(height),
        }
    }

    /// Returns `true` if this is the non-convergence sentinel.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Returns the point unless it is the sentinel.
    pub fn converged(self) -> Option<Self> {
        (!self.is_sentinel()).then_some(self)
    }

    /// Converts the position to a Cartesian position on `ellipsoid`. A missing
    /// height is taken as zero.
    pub fn to_cartesian(&self, ellipsoid: &Ellipsoid) -> Cartesian {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        let height = self.height.unwrap_or(0.0);
        let e2 = ellipsoid.eccentricity_squared();

        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let n = ellipsoid.prime_vertical_radius(lat);
        let x = (n + height) * cos_lat * cos_lon;
        let y = (n + height) * cos_lat * sin_lon;
        let z = (n * (1.0 - e2) + height) * sin_lat;

        Cartesian::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_cartesian_equator() {
        let c = GeodeticPoint::new(0.0, 0.0).to_cartesian(&WGS84);
        assert_relative_eq!(c.x, WGS84.semi_major_axis());
        assert_relative_eq!(c.y, 0.0);
        assert_relative_eq!(c.z, 0.0);
    }

    #[test]
    fn test_to_cartesian_pole() {
        let c = GeodeticPoint::with_height(90.0, 0.0, 100.0).to_cartesian(&WGS84);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(c.z, WGS84.semi_minor_axis() + 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sentinel() {
        assert!(GeodeticPoint::SENTINEL.is_sentinel());
        assert_eq!(GeodeticPoint::SENTINEL.converged(), None);
        let p = GeodeticPoint::with_height(-999.0, -999.0, 0.0);
        assert!(!p.is_sentinel());
        assert_eq!(p.converged(), Some(p));
    }

    #[test]
    fn test_serialize_without_height() {
        let json = serde_json::to_string(&GeodeticPoint::new(45.0, -93.0)).unwrap();
        assert_eq!(json, r#"{"lat":45.0,"lon":-93.0}"#);
        let back: GeodeticPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.height, None);
    }
}
