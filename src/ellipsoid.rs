use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

use crate::error::{GeodesyError, Result};

/// A reference ellipsoid of revolution.
///
/// Every operation in this crate takes the ellipsoid as a parameter; nothing
/// assumes the Earth. Lengths are in whatever unit the semi-axes are given in
/// (meters for the presets, except [`COSMIC_KM`]).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ellipsoid {
    a: f64,
    b: f64,
    f: f64,
    e2: f64,
}

impl Ellipsoid {
    /// Creates an ellipsoid from its semi-major and semi-minor axes.
    pub fn from_axes(a: f64, b: f64) -> Result<Self> {
        if !(a.is_finite() && b.is_finite()) {
            return Err(invalid(a, b, "axes must be finite"));
        }
        if a <= 0.0 {
            return Err(invalid(a, b, "semi-major axis must be positive"));
        }
        if b <= 0.0 {
            return Err(invalid(a, b, "semi-minor axis must be positive"));
        }
        if a <= b {
            return Err(invalid(
                a,
                b,
                "semi-major axis must exceed semi-minor axis",
            ));
        }
        Ok(Self::from_axes_unchecked(a, b))
    }

    /// Creates an ellipsoid from its semi-major axis and flattening
    /// `f = (a - b) / a`.
    pub fn from_flattening(a: f64, f: f64) -> Result<Self> {
        let b = a * (1.0 - f);
        if !(f > 0.0 && f < 1.0) {
            return Err(invalid(a, b, "flattening must lie in (0, 1)"));
        }
        Self::from_axes(a, b)
    }

    /// Creates an ellipsoid from its semi-major axis and inverse flattening
    /// `1 / f`, the form most datums are published in.
    pub fn from_inverse_flattening(a: f64, inverse_f: f64) -> Result<Self> {
        Self::from_flattening(a, 1.0 / inverse_f)
    }

    const fn from_axes_unchecked(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            f: (a - b) / a,
            e2: (a * a - b * b) / (a * a),
        }
    }

    const fn from_flattening_unchecked(a: f64, f: f64) -> Self {
        Self::from_axes_unchecked(a, a * (1.0 - f))
    }

    /// Semi-major (equatorial) axis.
    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    /// Semi-minor (polar) axis.
    pub fn semi_minor_axis(&self) -> f64 {
        self.b
    }

    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// Square of the first eccentricity, `(a² - b²) / a²`.
    pub fn eccentricity_squared(&self) -> f64 {
        self.e2
    }

    /// Radius of curvature in the prime vertical at geodetic latitude `lat`
    /// (radians).
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.e2 * lat.sin().powi(2)).sqrt()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        WGS84
    }
}

fn invalid(a: f64, b: f64, reason: &'static str) -> GeodesyError {
    GeodesyError::InvalidEllipsoid { a, b, reason }
}

/// World Geodetic System 1984, the default reference body.
pub const WGS84: Ellipsoid = Ellipsoid::from_flattening_unchecked(6_378_137.0, 1.0 / 298.257_223_563);

/// Earth model of the COSMIC occultation products. Axes are in kilometers, so
/// heights computed on it are in kilometers too.
pub const COSMIC_KM: Ellipsoid = Ellipsoid::from_axes_unchecked(6_378.137_0, 6_356.752_314_2);

/// Named reference ellipsoids.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Display, EnumString, EnumIter, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum EllipsoidName {
    #[default]
    Wgs84,
    Grs80,
    Wgs72,
    International1924,
    Clarke1866,
    Airy1830,
    CosmicKm,
}

impl EllipsoidName {
    pub fn ellipsoid(self) -> Ellipsoid {
        match self {
            Self::Wgs84 => WGS84,
            Self::Grs80 => Ellipsoid::from_flattening_unchecked(6_378_137.0, 1.0 / 298.257_222_101),
            Self::Wgs72 => Ellipsoid::from_flattening_unchecked(6_378_135.0, 1.0 / 298.26),
            Self::International1924 => {
                Ellipsoid::from_flattening_unchecked(6_378_388.0, 1.0 / 297.0)
            }
            Self::Clarke1866 => Ellipsoid::from_axes_unchecked(6_378_206.4, 6_356_583.8),
            Self::Airy1830 => Ellipsoid::from_axes_unchecked(6_377_563.396, 6_356_256.909),
            Self::CosmicKm => COSMIC_KM,
        }
    }
}

impl From<EllipsoidName> for Ellipsoid {
    fn from(name: EllipsoidName) -> Self {
        name.ellipsoid()
    }
}
