// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::f64::consts::FRAC_PI_4;

/// Equatorial radius of Earth (WGS 84 semi-major axis), in meters.
/// Source: https://en.wikipedia.org/wiki/World_Geodetic_System#WGS84
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Projects a longitude onto the x axis of the
/// [Web Mercator projection](https://en.wikipedia.org/wiki/Web_Mercator_projection).
/// Returns the result in (projected) meters.
pub fn lon_to_mercator_x(lon: f64) -> f64 {
    EARTH_RADIUS * lon.to_radians()
}

/// Projects a latitude onto the y axis of the
/// [Web Mercator projection](https://en.wikipedia.org/wiki/Web_Mercator_projection).
/// Returns the result in (projected) meters.
///
/// Projected distances are stretched by `1 / cos(lat)`; multiply by `cos(lat)`
/// to get back to ground distances.
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() * 0.5).tan().ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn origin_projects_to_zero() {
        assert_almost_eq!(lon_to_mercator_x(0.0), 0.0, 1e-9);
        assert_almost_eq!(lat_to_mercator_y(0.0), 0.0, 1e-9);
    }

    #[test]
    fn one_degree_at_equator() {
        // One degree of longitude at the equator is ~111.32 km
        assert_almost_eq!(lon_to_mercator_x(1.0), 111_319.49, 0.1);
        // ... and so is one degree of latitude, give or take the projection stretch
        assert_almost_eq!(lat_to_mercator_y(1.0), 111_325.14, 0.1);
    }

    #[test]
    fn projection_is_symmetric() {
        assert_almost_eq!(lat_to_mercator_y(52.23), -lat_to_mercator_y(-52.23), 1e-6);
        assert_almost_eq!(lon_to_mercator_x(21.01), -lon_to_mercator_x(-21.01), 1e-6);
    }
}
