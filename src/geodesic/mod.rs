//! Geodesics on an ellipsoid with Vincenty's method.
//!
//! The inverse problem gives the azimuths and distance between two points;
//! the direct problem gives the point reached from an origin along an azimuth
//! for a distance. Both iterate to a fixed tolerance and give up with
//! [`GeodesyError::IterationLimitExceeded`] rather than return an unconverged
//! answer, which near-antipodal inverse problems are prone to.
//!
//! Distances are in kilometers, so the ellipsoid must be given in meters.
//!
//! [`GeodesyError::IterationLimitExceeded`]: crate::error::GeodesyError::IterationLimitExceeded

mod direct;
mod inverse;

use std::fmt;

use serde::Serialize;

use crate::{coordinates::GeodeticPoint, ellipsoid::Ellipsoid, error::Result};

/// Convergence tolerance, in radians, of both iterations.
pub const EPS: f64 = 0.5e-13;

/// Default bound on the number of rounds of either iteration.
pub const MAX_ITERATIONS: usize = 1000;

/// Result of the inverse problem.
#[derive(Clone, Copy, PartialEq, Default, Debug, Serialize)]
pub struct Bearing {
    /// Azimuth from the first point to the second, degrees clockwise from
    /// north, in [0, 360).
    pub azimuth: f64,
    /// Azimuth from the second point back to the first, degrees clockwise
    /// from north, in [0, 360).
    pub back_azimuth: f64,
    /// Distance along the geodesic in kilometers.
    pub distance: f64,
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Azimuth: {} Back azimuth: {} Distance: {} km",
            self.azimuth, self.back_azimuth, self.distance
        )
    }
}

/// Solves geodesic problems on one ellipsoid.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GeodesicSolver {
    ellipsoid: Ellipsoid,
    max_iterations: usize,
    tolerance: f64,
}

impl GeodesicSolver {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            max_iterations: MAX_ITERATIONS,
            tolerance: EPS,
        }
    }

    /// Sets the number of rounds after which an iteration gives up.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance in radians.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Computes the azimuths and distance from `(lat1, lon1)` to
    /// `(lat2, lon2)`, all in degrees.
    ///
    /// Identical points give a zero bearing. Neither point may be a
    /// geographic pole.
    pub fn inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<Bearing> {
        inverse::solve(self, lat1, lon1, lat2, lon2)
    }

    /// Computes the point `distance_km` from `(lat1, lon1)` along `azimuth`,
    /// all angles in degrees. The returned longitude lies in [-180, 180).
    ///
    /// A zero distance returns the origin unchanged.
    pub fn direct(
        &self,
        lat1: f64,
        lon1: f64,
        azimuth: f64,
        distance_km: f64,
    ) -> Result<GeodeticPoint> {
        direct::solve(self, lat1, lon1, azimuth, distance_km)
    }

    /// Like [`inverse`](Self::inverse), between two points. Heights are
    /// ignored.
    pub fn bearing(&self, from: &GeodeticPoint, to: &GeodeticPoint) -> Result<Bearing> {
        self.inverse(from.lat, from.lon, to.lat, to.lon)
    }

    /// Like [`direct`](Self::direct), from a point. Its height is ignored.
    pub fn destination(
        &self,
        from: &GeodeticPoint,
        azimuth: f64,
        distance_km: f64,
    ) -> Result<GeodeticPoint> {
        self.direct(from.lat, from.lon, azimuth, distance_km)
    }
}

impl Default for GeodesicSolver {
    fn default() -> Self {
        Self::new(Ellipsoid::default())
    }
}

/// Solves the inverse problem on WGS-84. See [`GeodesicSolver::inverse`].
pub fn inverse(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<Bearing> {
    GeodesicSolver::default().inverse(lat1, lon1, lat2, lon2)
}

/// Solves the direct problem on WGS-84. See [`GeodesicSolver::direct`].
pub fn direct(lat1: f64, lon1: f64, azimuth: f64, distance_km: f64) -> Result<GeodeticPoint> {
    GeodesicSolver::default().direct(lat1, lon1, azimuth, distance_km)
}

/// `(C, D)` series coefficients of the arc length for `cos²α` of the
/// geodesic, shared by both problems.
fn helmert_terms(r: f64, cos2_alpha: f64) -> (f64, f64) {
    let x = ((1.0 / r / r - 1.0) * cos2_alpha + 1.0).sqrt() + 1.0;
    let x = (x - 2.0) / x;
    let c = (x * x / 4.0 + 1.0) / (1.0 - x);
    let d = (0.375 * x * x - 1.0) * x;
    (c, d)
}

/// Vincenty's `C` coefficient for the longitude correction.
fn longitude_coefficient(f: f64, cos2_alpha: f64) -> f64 {
    ((-3.0 * cos2_alpha + 4.0) * f + 4.0) * cos2_alpha * f / 16.0
}
