mod cartesian;
mod geodetic;
mod inertial;

pub use cartesian::{Cartesian, MAX_ITERATIONS};
pub use geodetic::GeodeticPoint;
pub use inertial::Inertial;
