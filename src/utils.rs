/// The value of π used by historical COSMIC products when converting radians
/// to degrees.
#[allow(clippy::approx_constant)]
pub const LEGACY_PI: f64 = 3.1415926;

/// Radian to degree conversion factor.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum DegreeScale {
    /// `180 / π` at full precision.
    #[default]
    Exact,
    /// `180 / 3.1415926`, as used by historical COSMIC products.
    Legacy,
}

impl DegreeScale {
    /// Converts an angle in radians to degrees.
    pub fn to_degrees(self, rad: f64) -> f64 {
        match self {
            Self::Exact => rad.to_degrees(),
            Self::Legacy => rad * 180.0 / LEGACY_PI,
        }
    }
}

/// Wraps a value to the range [-180, 180).
pub fn wrap_longitude_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Wraps an azimuth in degrees to the range [0, 360).
pub fn normalize_azimuth(az: f64) -> f64 {
    let az = az % 360.0;
    let az = if az < 0.0 { az + 360.0 } else { az };
    // Adding 360 to a tiny negative value rounds up to exactly 360.
    if az >= 360.0 { az - 360.0 } else { az }
}
