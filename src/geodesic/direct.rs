use tracing::{debug, warn};

use super::{GeodesicSolver, helmert_terms, longitude_coefficient};
use crate::{
    coordinates::GeodeticPoint,
    error::{GeodesicProblem, GeodesyError, Result},
    utils::{normalize_azimuth, wrap_longitude_deg},
};

pub(super) fn solve(
    solver: &GeodesicSolver,
    lat1: f64,
    lon1: f64,
    azimuth: f64,
    distance_km: f64,
) -> Result<GeodeticPoint> {
    if distance_km == 0.0 {
        return Ok(GeodeticPoint::new(lat1, lon1));
    }

    let a = solver.ellipsoid.semi_major_axis();
    let f = solver.ellipsoid.flattening();
    let r = 1.0 - f;

    let (sin_azimuth, cos_azimuth) = normalize_azimuth(azimuth).to_radians().sin_cos();
    let tan_u1 = r * lat1.to_radians().tan();
    // Twice the arc from the equator crossing to the origin.
    let sigma1 = if cos_azimuth != 0.0 {
        tan_u1.atan2(cos_azimuth) * 2.0
    } else {
        0.0
    };
    let cos_u1 = 1.0 / (tan_u1 * tan_u1 + 1.0).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let sin_alpha = cos_u1 * sin_azimuth;
    let cos2_alpha = 1.0 - sin_alpha * sin_alpha;

    let (c, d) = helmert_terms(r, cos2_alpha);
    let first = distance_km * 1000.0 / r / a / c;
    let mut sigma = first;

    let mut iterations = 0;
    let (sin_sigma, cos_sigma, cos_2sigma_m, e) = loop {
        iterations += 1;
        if iterations > solver.max_iterations {
            let problem = GeodesicProblem::Direct {
                lat1,
                lon1,
                azimuth,
                distance_km,
            };
            warn!(%problem, "direct geodesic did not converge");
            return Err(GeodesyError::IterationLimitExceeded {
                iterations: solver.max_iterations,
                problem,
            });
        }

        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let cos_2sigma_m = (sigma1 + sigma).cos();
        let e = cos_2sigma_m * cos_2sigma_m * 2.0 - 1.0;

        let previous = sigma;
        let y = e + e - 1.0;
        sigma = (((sin_sigma * sin_sigma * 4.0 - 3.0) * y * cos_2sigma_m * d / 6.0
            + e * cos_sigma)
            * d
            / 4.0
            - cos_2sigma_m)
            * sin_sigma
            * d
            + first;

        if (sigma - previous).abs() <= solver.tolerance {
            break (sin_sigma, cos_sigma, cos_2sigma_m, e);
        }
    };
    debug!(iterations, "direct geodesic converged");

    let back = cos_u1 * cos_sigma * cos_azimuth - sin_u1 * sin_sigma;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_azimuth)
        .atan2(r * (sin_alpha * sin_alpha + back * back).sqrt());
    let lambda = (sin_sigma * sin_azimuth)
        .atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_azimuth);

    // Longitude correction with the converged arc and last round's terms.
    let c = longitude_coefficient(f, cos2_alpha);
    let correction = ((e * cos_sigma * c + cos_2sigma_m) * sin_sigma * c + sigma) * sin_alpha;
    let lon2 = lon1.to_radians() + lambda - (1.0 - c) * correction * f;

    Ok(GeodeticPoint::new(
        lat2.to_degrees(),
        wrap_longitude_deg(lon2.to_degrees()),
    ))
}
