use serde::Deserialize;

use geodesic::{
    CosmicConverter, DegreeScale, Ellipsoid, EllipsoidName, GeodesicSolver, Result,
    ellipsoid::COSMIC_KM, geodesic::EPS, geodesic::MAX_ITERATIONS,
};

/// Configuration for the application.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub geodesic: GeodesicConfig,
    pub cosmic: CosmicConfig,
}

/// Configuration for the geodesic and conversion commands.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeodesicConfig {
    pub ellipsoid: EllipsoidName,

    /// Custom ellipsoid in meters; overrides `ellipsoid` when both are set.
    pub semi_major_axis: Option<f64>,
    pub inverse_flattening: Option<f64>,

    pub max_iterations: usize,
    pub tolerance: f64,
}

impl GeodesicConfig {
    /// Returns the configured ellipsoid, `name` taking precedence over the
    /// configured preset.
    pub fn ellipsoid(&self, name: Option<EllipsoidName>) -> Result<Ellipsoid> {
        if let Some(name) = name {
            return Ok(name.ellipsoid());
        }
        match (self.semi_major_axis, self.inverse_flattening) {
            (Some(a), Some(inverse_f)) => Ellipsoid::from_inverse_flattening(a, inverse_f),
            _ => Ok(self.ellipsoid.ellipsoid()),
        }
    }

    pub fn solver(&self, name: Option<EllipsoidName>) -> Result<GeodesicSolver> {
        Ok(GeodesicSolver::new(self.ellipsoid(name)?)
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance))
    }
}

impl Default for GeodesicConfig {
    fn default() -> Self {
        Self {
            ellipsoid: EllipsoidName::Wgs84,
            semi_major_axis: None,
            inverse_flattening: None,
            max_iterations: MAX_ITERATIONS,
            tolerance: EPS,
        }
    }
}

/// Configuration for the COSMIC track conversion.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CosmicConfig {
    /// Converts radians to degrees with `180 / 3.1415926`.
    pub legacy_pi: bool,
    /// Seconds added to the reference epoch before computing the hour angle.
    pub offset_seconds: f64,
}

impl CosmicConfig {
    pub fn converter(&self) -> CosmicConverter {
        let scale = if self.legacy_pi {
            DegreeScale::Legacy
        } else {
            DegreeScale::Exact
        };
        CosmicConverter::new(COSMIC_KM, scale)
    }
}

impl Default for CosmicConfig {
    fn default() -> Self {
        Self {
            legacy_pi: true,
            offset_seconds: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodesic::ellipsoid::WGS84;

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.geodesic.ellipsoid(None).unwrap(), WGS84);
        assert_eq!(config.geodesic.max_iterations, 1000);
        assert_eq!(config.geodesic.tolerance, 0.5e-13);
        assert!(config.cosmic.legacy_pi);
        assert_eq!(config.cosmic.converter(), CosmicConverter::default());
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r#"
            [geodesic]
            ellipsoid = "grs80"
            max_iterations = 200
            tolerance = 1e-12

            [cosmic]
            legacy_pi = false
            offset_seconds = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(
            config.geodesic.ellipsoid(None).unwrap(),
            EllipsoidName::Grs80.ellipsoid()
        );
        let solver = config.geodesic.solver(None).unwrap();
        assert_eq!(solver.max_iterations(), 200);
        assert_eq!(solver.tolerance(), 1e-12);
        assert_eq!(config.cosmic.converter().scale(), DegreeScale::Exact);
        assert_eq!(config.cosmic.offset_seconds, 30.0);
    }

    #[test]
    fn test_custom_ellipsoid() {
        let config: Config = toml::from_str(
            r#"
            [geodesic]
            semi_major_axis = 6378137.0
            inverse_flattening = 298.257223563
            "#,
        )
        .unwrap();
        assert_eq!(config.geodesic.ellipsoid(None).unwrap(), WGS84);
        assert_eq!(
            config.geodesic.ellipsoid(Some(EllipsoidName::Airy1830)).unwrap(),
            EllipsoidName::Airy1830.ellipsoid()
        );

        let config: Config = toml::from_str(
            r#"
            [geodesic]
            semi_major_axis = -1.0
            inverse_flattening = 298.0
            "#,
        )
        .unwrap();
        assert!(config.geodesic.ellipsoid(None).is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<Config>("[geodesic]\nflattening = 0.003\n").is_err());
        assert!(toml::from_str::<Config>("[display]\n").is_err());
    }
}
