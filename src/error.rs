//! Error types shared by every geodesy component.

use std::fmt;

use thiserror::Error;

/// Result type alias for geodesy operations.
pub type Result<T> = std::result::Result<T, GeodesyError>;

/// The inputs of a geodesic problem, kept for diagnostics when the solver
/// gives up.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GeodesicProblem {
    /// Bearing and distance between two points.
    Inverse {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
    /// Destination from an origin, azimuth and distance.
    Direct {
        lat1: f64,
        lon1: f64,
        azimuth: f64,
        distance_km: f64,
    },
}

impl fmt::Display for GeodesicProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverse {
                lat1,
                lon1,
                lat2,
                lon2,
            } => write!(f, "bearing: {lat1} {lon1} {lat2} {lon2}"),
            Self::Direct {
                lat1,
                lon1,
                azimuth,
                distance_km,
            } => write!(
                f,
                "destination: {lat1} {lon1} azimuth {azimuth} distance {distance_km} km"
            ),
        }
    }
}

#[derive(Error, Clone, PartialEq, Debug)]
pub enum GeodesyError {
    /// Ellipsoid parameters describe no valid oblate ellipsoid.
    #[error("Invalid ellipsoid (a = {a}, b = {b}): {reason}")]
    InvalidEllipsoid { a: f64, b: f64, reason: &'static str },

    /// An iterative geodesic solution did not settle within the allowed
    /// number of rounds. Typical for nearly antipodal points.
    #[error("Too many iterations ({iterations}) calculating {problem}")]
    IterationLimitExceeded {
        iterations: usize,
        problem: GeodesicProblem,
    },

    /// Cartesian to geodetic conversion did not converge.
    #[error("Geodetic conversion did not converge for ({x}, {y}, {z})")]
    ConvergenceFailure { x: f64, y: f64, z: f64 },

    /// A rotation axis of zero length has no direction.
    #[error("Rotation axis has zero length")]
    ZeroRotationAxis,

    /// Coordinate columns of one track differ in length.
    #[error("Coordinate columns differ in length (x: {x}, y: {y}, z: {z})")]
    LengthMismatch { x: usize, y: usize, z: usize },

    /// Calendar fields do not form a supported Gregorian date and time.
    #[error("Invalid epoch {year}-{month:02}-{day:02}: {reason}")]
    InvalidEpoch {
        year: i32,
        month: u32,
        day: u32,
        reason: &'static str,
    },
}
