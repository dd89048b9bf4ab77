use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::GeodeticPoint;
use crate::{
    ellipsoid::Ellipsoid,
    error::{GeodesyError, Result},
    utils::{DegreeScale, wrap_longitude_deg},
};

/// Maximum number of refinement steps in [`Cartesian::to_geodetic`].
pub const MAX_ITERATIONS: usize = 10;

/// Latitude change (radians) below which the iteration has converged.
const LATITUDE_TOLERANCE: f64 = 1e-11;

/// Height change (ellipsoid units) below which the iteration has converged.
const HEIGHT_TOLERANCE: f64 = 1e-5;

/// A position in a body-fixed Cartesian frame, in the units of the ellipsoid
/// it is converted on.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian {
    /// Creates a new `Cartesian`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian { x, y, z }
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Converts the position to a geodetic position.
    ///
    /// Returns [`GeodeticPoint::SENTINEL`] when the iteration does not
    /// converge, which happens for degenerate input such as the origin.
    ///
    /// The iteration divides by the distance from the polar axis, so it is
    /// poorly conditioned right next to it: within a few meters of the axis
    /// converting back with [`GeodeticPoint::to_cartesian`] can miss the
    /// original position by millimeters to centimeters. Away from the axis
    /// the round trip holds to about a nanometer.
    pub fn to_geodetic(&self, ellipsoid: &Ellipsoid) -> GeodeticPoint {
        self.to_geodetic_scaled(ellipsoid, DegreeScale::Exact)
    }

    /// Like [`to_geodetic`](Self::to_geodetic), converting the angles to
    /// degrees with the given scale.
    pub fn to_geodetic_scaled(&self, ellipsoid: &Ellipsoid, scale: DegreeScale) -> GeodeticPoint {
        match cartesian_to_geodetic(self, ellipsoid) {
            Some((lat, lon, height)) => GeodeticPoint::with_height(
                scale.to_degrees(lat),
                scale.to_degrees(lon),
                height,
            ),
            None => {
                warn!(x = self.x, y = self.y, z = self.z, "geodetic conversion did not converge");
                GeodeticPoint::SENTINEL
            }
        }
    }

    /// Converts the position to a geodetic position, reporting non-convergence
    /// as an error instead of the sentinel.
    pub fn try_to_geodetic(&self, ellipsoid: &Ellipsoid) -> Result<GeodeticPoint> {
        self.to_geodetic(ellipsoid)
            .converged()
            .ok_or(GeodesyError::ConvergenceFailure {
                x: self.x,
                y: self.y,
                z: self.z,
            })
    }

    /// Converts the position to a geodetic position with Bowring's
    /// non-iterative approximation.
    ///
    /// Accurate to well under a millimeter for terrestrial heights; useful as
    /// a cross-check of [`to_geodetic`](Self::to_geodetic).
    pub fn to_geodetic_closed_form(&self, ellipsoid: &Ellipsoid) -> GeodeticPoint {
        let a = ellipsoid.semi_major_axis();
        let b = ellipsoid.semi_minor_axis();
        let e2 = ellipsoid.eccentricity_squared();
        let ep2 = (a * a - b * b) / (b * b); // Second eccentricity squared

        // Calculate longitude
        let longitude = self.y.atan2(self.x);

        // Calculate latitude
        let p = (self.x.powi(2) + self.y.powi(2)).sqrt();
        let theta = (self.z * a).atan2(p * b);
        let (sin_theta, cos_theta) = theta.sin_cos();
        let latitude =
            (self.z + ep2 * b * sin_theta.powi(3)).atan2(p - e2 * a * cos_theta.powi(3));

        // Calculate altitude
        let n = ellipsoid.prime_vertical_radius(latitude);
        let altitude = p / latitude.cos() - n;

        GeodeticPoint::with_height(
            latitude.to_degrees(),
            wrap_longitude_deg(longitude.to_degrees()),
            altitude,
        )
    }
}

impl From<[f64; 3]> for Cartesian {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3<f64>> for Cartesian {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Cartesian> for Vector3<f64> {
    fn from(c: Cartesian) -> Self {
        Vector3::new(c.x, c.y, c.z)
    }
}

/// Converts a Cartesian position to `(latitude, longitude, height)` with
/// latitude and longitude in radians, refining latitude and height together.
///
/// Returns `None` if both have not settled after [`MAX_ITERATIONS`] steps.
fn cartesian_to_geodetic(c: &Cartesian, ellipsoid: &Ellipsoid) -> Option<(f64, f64, f64)> {
    let a = ellipsoid.semi_major_axis();
    let e2 = ellipsoid.eccentricity_squared();

    let s = (c.x * c.x + c.y * c.y).sqrt();
    let longitude = c.y.atan2(c.x);
    let z_over_s = c.z / s;

    let mut height = c.norm() - a;
    let mut latitude = (z_over_s / (1.0 - e2 * a / (a + height))).atan();

    // NaN fails both comparisons, so degenerate input runs out of iterations.
    for iteration in 1..=MAX_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius(latitude);
        let (prev_latitude, prev_height) = (latitude, height);
        height = s / latitude.cos() - n;
        latitude = (z_over_s / (1.0 - e2 * n / (n + height))).atan();

        if (prev_latitude - latitude).abs() <= LATITUDE_TOLERANCE
            && (prev_height - height).abs() <= HEIGHT_TOLERANCE
        {
            debug!(iteration, "geodetic conversion converged");
            return Some((latitude, longitude, height));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::{COSMIC_KM, WGS84};
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_on_surface() {
        let p = Cartesian::new(6_378_137.0, 0.0, 0.0).to_geodetic(&WGS84);
        assert_relative_eq!(p.lat, 0.0);
        assert_relative_eq!(p.lon, 0.0);
        assert_relative_eq!(p.height.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_known_point() {
        let p = Cartesian::new(-2_694_892.46, -4_297_453.38, 3_854_335.53).to_geodetic(&WGS84);
        assert_relative_eq!(p.lat, 37.414_742_985_113_755, epsilon = 1e-9);
        assert_relative_eq!(p.lon, -122.091_436_540_542_13, epsilon = 1e-9);
        assert_relative_eq!(p.height.unwrap(), 465.296_707_987_785_34, epsilon = 1e-6);
    }

    #[test]
    fn test_legacy_scale() {
        let c = Cartesian::new(-4000.0, 3000.0, 4200.0);
        let exact = c.to_geodetic(&COSMIC_KM);
        let legacy = c.to_geodetic_scaled(&COSMIC_KM, DegreeScale::Legacy);
        assert_relative_eq!(exact.lat, 40.215_232_983_510_916, epsilon = 1e-9);
        assert_relative_eq!(legacy.lat, 40.215_233_669_508_85, epsilon = 1e-9);
        assert_relative_eq!(legacy.lon, 143.130_104_795_692_35, epsilon = 1e-9);
        assert_eq!(exact.height, legacy.height);
        assert_relative_eq!(exact.height.unwrap(), 160.666_131_143_158_96, epsilon = 1e-8);
    }

    #[test]
    fn test_origin_returns_sentinel() {
        let p = Cartesian::new(0.0, 0.0, 0.0).to_geodetic(&WGS84);
        assert!(p.is_sentinel());
        assert_eq!(p, GeodeticPoint::SENTINEL);
    }

    #[test]
    fn test_near_polar_axis_is_poorly_conditioned() {
        for (c, worst) in [
            (Cartesian::new(1.0, 0.0, 6_356_752.0), 0.01),
            (Cartesian::new(0.01, 0.01, -6.4e6), 0.1),
        ] {
            let p = c.to_geodetic(&WGS84);
            assert!(!p.is_sentinel());
            assert!(p.lat.abs() > 89.9999);
            let miss = (p.to_cartesian(&WGS84).z - c.z).abs();
            assert!(miss > 1e-6 && miss < worst, "{c:?} missed by {miss}");
        }
    }

    #[test]
    fn test_try_to_geodetic() {
        let err = Cartesian::new(0.0, 0.0, 0.0).try_to_geodetic(&WGS84).unwrap_err();
        assert!(matches!(err, GeodesyError::ConvergenceFailure { .. }));
        assert!(
            Cartesian::new(4_510_731.0, 4_510_731.0, 0.0)
                .try_to_geodetic(&WGS84)
                .is_ok()
        );
    }

    #[test]
    fn test_closed_form_agrees_with_iteration() {
        for c in [
            Cartesian::new(1_113_194.9, -4_696_824.0, 4_077_985.5),
            Cartesian::new(-2_694_892.46, -4_297_453.38, 3_854_335.53),
            Cartesian::new(4_510_731.0, 4_510_731.0, 0.0),
            Cartesian::new(-3_000_000.0, 500_000.0, -5_500_000.0),
        ] {
            let iterative = c.to_geodetic(&WGS84);
            let closed = c.to_geodetic_closed_form(&WGS84);
            assert_relative_eq!(iterative.lat, closed.lat, epsilon = 1e-8);
            assert_relative_eq!(iterative.lon, closed.lon, epsilon = 1e-12);
            assert_relative_eq!(iterative.height.unwrap(), closed.height.unwrap(), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_vector_conversions() {
        let c = Cartesian::from([1.0, 2.0, 3.0]);
        let v: Vector3<f64> = c.into();
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Cartesian::from(v), c);
        assert_relative_eq!(c.norm(), 14.0_f64.sqrt());
    }
}
