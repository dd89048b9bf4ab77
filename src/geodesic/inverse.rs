use std::f64::consts::PI;

use tracing::{debug, warn};

use super::{Bearing, GeodesicSolver, helmert_terms, longitude_coefficient};
use crate::{
    error::{GeodesicProblem, GeodesyError, Result},
    utils::normalize_azimuth,
};

/// Quantities of the last round of the longitude iteration.
struct Round {
    sin_lambda: f64,
    cos_lambda: f64,
    /// `cos U2 sin λ`, numerator of the forward azimuth.
    azimuth_sin: f64,
    /// `cos U1 sin U2 - sin U1 cos U2 cos λ`, denominator of the forward azimuth.
    azimuth_cos: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    sigma: f64,
    cos2_alpha: f64,
    cos_2sigma_m: f64,
    e: f64,
}

pub(super) fn solve(
    solver: &GeodesicSolver,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<Bearing> {
    if lat1 == lat2 && lon1 == lon2 {
        return Ok(Bearing::default());
    }

    let a = solver.ellipsoid.semi_major_axis();
    let f = solver.ellipsoid.flattening();
    let r = 1.0 - f;

    // Reduced latitudes
    let tan_u1 = r * lat1.to_radians().tan();
    let tan_u2 = r * lat2.to_radians().tan();
    let cos_u1 = 1.0 / (tan_u1 * tan_u1 + 1.0).sqrt();
    let sin_u1 = cos_u1 * tan_u1;
    let cos_u2 = 1.0 / (tan_u2 * tan_u2 + 1.0).sqrt();

    let cos_u1_cos_u2 = cos_u1 * cos_u2;
    let cos_u1_sin_u2 = cos_u1_cos_u2 * tan_u2;
    let sin_u1_sin_u2 = cos_u1_sin_u2 * tan_u1;

    let l = lon2.to_radians() - lon1.to_radians();
    let mut lambda = l;

    let mut iterations = 0;
    let round = loop {
        iterations += 1;
        if iterations > solver.max_iterations {
            let problem = GeodesicProblem::Inverse {
                lat1,
                lon1,
                lat2,
                lon2,
            };
            warn!(%problem, "inverse geodesic did not converge");
            return Err(GeodesyError::IterationLimitExceeded {
                iterations: solver.max_iterations,
                problem,
            });
        }

        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let azimuth_sin = cos_u2 * sin_lambda;
        let azimuth_cos = cos_u1_sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        let sin_sigma = (azimuth_sin * azimuth_sin + azimuth_cos * azimuth_cos).sqrt();
        let cos_sigma = cos_u1_cos_u2 * cos_lambda + sin_u1_sin_u2;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1_cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        // cos²α vanishes for lines along the equator.
        let cos_2sigma_m = if cos2_alpha > 0.0 {
            cos_sigma - 2.0 * sin_u1_sin_u2 / cos2_alpha
        } else {
            2.0 * sin_u1_sin_u2
        };
        let e = cos_2sigma_m * cos_2sigma_m * 2.0 - 1.0;
        let c = longitude_coefficient(f, cos2_alpha);

        let previous = lambda;
        lambda = ((e * cos_sigma * c + cos_2sigma_m) * sin_sigma * c + sigma) * sin_alpha;
        lambda = (1.0 - c) * lambda * f + l;

        // NaN never compares within tolerance, so it runs into the limit.
        if (previous - lambda).abs() <= solver.tolerance {
            break Round {
                sin_lambda,
                cos_lambda,
                azimuth_sin,
                azimuth_cos,
                sin_sigma,
                cos_sigma,
                sigma,
                cos2_alpha,
                cos_2sigma_m,
                e,
            };
        }
    };
    debug!(iterations, "inverse geodesic converged");

    let forward = round.azimuth_sin.atan2(round.azimuth_cos);
    let backward = (cos_u1 * round.sin_lambda)
        .atan2(cos_u1_sin_u2 * round.cos_lambda - sin_u1 * cos_u2)
        + PI;

    let (c, d) = helmert_terms(r, round.cos2_alpha);
    let Round {
        sin_sigma,
        cos_sigma,
        sigma,
        cos_2sigma_m,
        e,
        ..
    } = round;
    let y = 1.0 - e - e;
    let distance = ((((sin_sigma * sin_sigma * 4.0 - 3.0) * y * cos_2sigma_m * d / 6.0
        - e * cos_sigma)
        * d
        / 4.0
        + cos_2sigma_m)
        * sin_sigma
        * d
        + sigma)
        * c
        * a
        * r;

    Ok(Bearing {
        azimuth: normalize_azimuth(forward.to_degrees()),
        back_azimuth: normalize_azimuth(backward.to_degrees()),
        distance: distance / 1000.0,
    })
}
