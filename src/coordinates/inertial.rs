use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::Cartesian;
use crate::{rotation, sidereal};

/// A position in a celestial inertial frame.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Inertial {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Inertial {
    /// Creates a new `Inertial`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Inertial { x, y, z }
    }

    /// Converts the position to an approximate Earth-fixed position.
    ///
    /// The frame is turned back by the Greenwich hour angle about the spin
    /// axis; precession, nutation and polar motion are ignored.
    ///
    /// # Arguments
    ///
    /// * `hour_angle` - Greenwich hour angle in radians, e.g. from
    ///   [`sidereal::gast`]
    pub fn to_earth_fixed(&self, hour_angle: f64) -> Cartesian {
        rotation::spin_z(&Vector3::from(*self), -hour_angle).into()
    }

    /// Converts the position to an approximate Earth-fixed position at the
    /// given number of seconds since 1970-01-01 00:00 UT.
    pub fn to_earth_fixed_at_unix_seconds(&self, seconds: f64) -> Cartesian {
        self.to_earth_fixed(sidereal::greenwich_hour_angle_unix(seconds))
    }
}

impl From<[f64; 3]> for Inertial {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Inertial> for Vector3<f64> {
    fn from(v: Inertial) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}
