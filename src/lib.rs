//! Ellipsoidal geodesy: Cartesian to geodetic conversion, sidereal rotation
//! of inertial positions and Vincenty geodesics.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ellipsoid`] | [`Ellipsoid`] parameters and named presets |
//! | [`coordinates`] | [`Cartesian`], [`GeodeticPoint`] and [`Inertial`] positions and conversions between them |
//! | [`sidereal`] | Julian day and Greenwich hour angle of a UTC epoch |
//! | [`rotation`] | Axis-angle rotation of vectors |
//! | [`geodesic`] | Inverse and direct geodesic problems ([`GeodesicSolver`]) |
//! | [`cosmic`] | Batch conversion of COSMIC inertial tracks ([`CosmicConverter`]) |
//!
//! # Example
//!
//! ```
//! use geodesic::{Cartesian, GeodesicSolver, ellipsoid::WGS84};
//!
//! let bearing = GeodesicSolver::default().inverse(0.0, 0.0, 0.0, 1.0)?;
//! assert!((bearing.distance - 111.319).abs() < 1e-3);
//!
//! let point = Cartesian::new(6_378_137.0, 0.0, 0.0).to_geodetic(&WGS84);
//! assert!(!point.is_sentinel());
//! # Ok::<(), geodesic::GeodesyError>(())
//! ```

pub mod coordinates;
pub mod cosmic;
pub mod ellipsoid;
pub mod error;
pub mod geodesic;
pub mod rotation;
pub mod sidereal;
pub mod utils;

pub use coordinates::{Cartesian, GeodeticPoint, Inertial};
pub use cosmic::{CosmicConverter, GeodeticTrack};
pub use ellipsoid::{Ellipsoid, EllipsoidName};
pub use error::{GeodesicProblem, GeodesyError, Result};
pub use geodesic::{Bearing, GeodesicSolver};
pub use sidereal::CalendarEpoch;
pub use utils::DegreeScale;
