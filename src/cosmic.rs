//! Geodetic positions for COSMIC occultation products.
//!
//! COSMIC files carry satellite positions in kilometers in an inertial frame
//! together with a UTC reference epoch. Positions are turned into an
//! approximate Earth-fixed frame by the Greenwich hour angle of that epoch,
//! then converted to latitude, longitude and altitude on [`COSMIC_KM`] using
//! the legacy degree scale so that results match historical products.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    coordinates::{GeodeticPoint, Inertial},
    ellipsoid::{COSMIC_KM, Ellipsoid},
    error::{GeodesyError, Result},
    sidereal::CalendarEpoch,
    utils::DegreeScale,
};

/// Latitude, longitude and altitude arrays of a converted track.
///
/// Samples whose conversion did not converge hold the `-999` sentinel in all
/// three arrays.
#[derive(Clone, PartialEq, Default, Debug, Serialize)]
pub struct GeodeticTrack {
    /// Latitudes in degrees.
    pub lat: Vec<f64>,
    /// Longitudes in degrees.
    pub lon: Vec<f64>,
    /// Altitudes in the ellipsoid's length unit.
    pub alt: Vec<f64>,
}

impl GeodeticTrack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lat: Vec::with_capacity(capacity),
            lon: Vec::with_capacity(capacity),
            alt: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: GeodeticPoint) {
        self.lat.push(point.lat);
        self.lon.push(point.lon);
        self.alt.push(point.height.unwrap_or(f64::NAN));
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Returns the sample at `index`.
    pub fn get(&self, index: usize) -> Option<GeodeticPoint> {
        Some(GeodeticPoint::with_height(
            *self.lat.get(index)?,
            *self.lon.get(index)?,
            *self.alt.get(index)?,
        ))
    }

    /// Number of samples holding the non-convergence sentinel.
    pub fn sentinel_count(&self) -> usize {
        (0..self.len())
            .filter_map(|i| self.get(i))
            .filter(GeodeticPoint::is_sentinel)
            .count()
    }
}

impl FromIterator<GeodeticPoint> for GeodeticTrack {
    fn from_iter<I: IntoIterator<Item = GeodeticPoint>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut track = Self::with_capacity(iter.size_hint().0);
        iter.for_each(|point| track.push(point));
        track
    }
}

/// Converts inertial positions to geodetic positions.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CosmicConverter {
    ellipsoid: Ellipsoid,
    scale: DegreeScale,
}

impl CosmicConverter {
    pub fn new(ellipsoid: Ellipsoid, scale: DegreeScale) -> Self {
        Self { ellipsoid, scale }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn scale(&self) -> DegreeScale {
        self.scale
    }

    /// Converts one position given the Greenwich hour angle in radians.
    pub fn convert(&self, position: &Inertial, hour_angle: f64) -> GeodeticPoint {
        position
            .to_earth_fixed(hour_angle)
            .to_geodetic_scaled(&self.ellipsoid, self.scale)
    }

    /// Converts positions sampled around one epoch.
    ///
    /// A single hour angle, that of `epoch` plus `offset_seconds`, is applied
    /// to every position.
    pub fn convert_track(
        &self,
        epoch: &CalendarEpoch,
        offset_seconds: f64,
        positions: &[Inertial],
    ) -> GeodeticTrack {
        let hour_angle = epoch.hour_angle(offset_seconds);
        debug!(hour_angle, samples = positions.len(), "converting track");

        let track: GeodeticTrack = positions
            .iter()
            .map(|position| self.convert(position, hour_angle))
            .collect();
        log_sentinels(&track);
        track
    }

    /// Like [`convert_track`](Self::convert_track), for positions stored as
    /// separate X, Y and Z columns.
    pub fn convert_columns(
        &self,
        epoch: &CalendarEpoch,
        offset_seconds: f64,
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
    ) -> Result<GeodeticTrack> {
        if xs.len() != ys.len() || xs.len() != zs.len() {
            return Err(GeodesyError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
                z: zs.len(),
            });
        }

        let positions: Vec<Inertial> = xs
            .iter()
            .zip(ys)
            .zip(zs)
            .map(|((&x, &y), &z)| Inertial::new(x, y, z))
            .collect();
        Ok(self.convert_track(epoch, offset_seconds, &positions))
    }

    /// Converts positions that each carry their own epoch.
    pub fn convert_samples(
        &self,
        samples: &[(CalendarEpoch, Inertial)],
        offset_seconds: f64,
    ) -> GeodeticTrack {
        let track: GeodeticTrack = samples
            .iter()
            .map(|(epoch, position)| self.convert(position, epoch.hour_angle(offset_seconds)))
            .collect();
        log_sentinels(&track);
        track
    }
}

impl Default for CosmicConverter {
    fn default() -> Self {
        Self::new(COSMIC_KM, DegreeScale::Legacy)
    }
}

fn log_sentinels(track: &GeodeticTrack) {
    let failed = track.sentinel_count();
    if failed > 0 {
        warn!(failed, samples = track.len(), "some positions did not converge");
    }
}
