//! geodesic.rs — direct / inverse geodesic problems on the WGS84 ellipsoid
//!
//! Both problems go through the same ellipsoid model (Karney's algorithm from
//! `geo::Geodesic`). Mixing models silently skews pivot distances, so nothing
//! else in the crate computes distances or headings on its own.
//!
//! A solver result that is not finite is reported as [`GeometryError`]. The
//! `*_or_estimate` helpers recover from it with a spherical (haversine)
//! estimate for that single computation and log a warning.

use geo::{Bearing, Destination, Distance, Geodesic, Haversine, Point};
use tracing::warn;
use xc_types::LatLon;

use crate::error::GeometryError;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Solution of the inverse problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse {
    /// Meters
    pub distance: f64,
    /// Initial heading at `from`, degrees in [0, 360)
    pub heading: f64,
}

pub trait GeodesicProvider: Send + Sync {
    /// Distance and initial heading from `from` to `to`.
    fn inverse(&self, from: LatLon, to: LatLon) -> Result<Inverse, GeometryError>;

    /// Destination reached from `from` after `distance` meters along `heading`.
    fn direct(&self, from: LatLon, heading: f64, distance: f64) -> Result<LatLon, GeometryError>;

    fn inverse_or_estimate(&self, from: LatLon, to: LatLon) -> Inverse {
        match self.inverse(from, to) {
            Ok(inv) => inv,
            Err(e) => {
                warn!("Geodesic inverse failed ({e}), using spherical estimate for {from:?} -> {to:?}");
                spherical_inverse(from, to)
            }
        }
    }

    fn direct_or_estimate(&self, from: LatLon, heading: f64, distance: f64) -> LatLon {
        match self.direct(from, heading, distance) {
            Ok(dest) => dest,
            Err(e) => {
                warn!("Geodesic direct failed ({e}), using spherical estimate from {from:?}");
                spherical_direct(from, heading, distance)
            }
        }
    }

    fn distance(&self, from: LatLon, to: LatLon) -> f64 {
        self.inverse_or_estimate(from, to).distance
    }

    fn heading(&self, from: LatLon, to: LatLon) -> f64 {
        self.inverse_or_estimate(from, to).heading
    }
}

// ── WGS84 provider ────────────────────────────────────────────────────────────

/// Ellipsoidal solver on WGS84.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84;

impl GeodesicProvider for Wgs84 {
    fn inverse(&self, from: LatLon, to: LatLon) -> Result<Inverse, GeometryError> {
        let (a, b) = (to_point(from), to_point(to));
        let distance = Geodesic.distance(a, b);
        let heading = Geodesic.bearing(a, b);
        if distance.is_finite() && heading.is_finite() {
            Ok(Inverse {
                distance,
                heading: normalize_heading(heading),
            })
        } else {
            Err(GeometryError::NonFiniteInverse { distance, heading })
        }
    }

    fn direct(&self, from: LatLon, heading: f64, distance: f64) -> Result<LatLon, GeometryError> {
        let dest = Geodesic.destination(to_point(from), heading, distance);
        let (lat, lon) = (dest.y(), dest.x());
        if lat.is_finite() && lon.is_finite() {
            Ok(LatLon::new(lat, lon))
        } else {
            Err(GeometryError::NonFiniteDirect { lat, lon })
        }
    }
}

// ── Spherical fallback ────────────────────────────────────────────────────────

fn spherical_inverse(from: LatLon, to: LatLon) -> Inverse {
    let (a, b) = (to_point(from), to_point(to));
    let distance = Haversine.distance(a, b);
    let heading = Haversine.bearing(a, b);
    Inverse {
        distance: if distance.is_finite() { distance } else { 0.0 },
        heading: if heading.is_finite() { normalize_heading(heading) } else { 0.0 },
    }
}

fn spherical_direct(from: LatLon, heading: f64, distance: f64) -> LatLon {
    let dest = Haversine.destination(to_point(from), heading, distance);
    if dest.y().is_finite() && dest.x().is_finite() {
        LatLon::new(dest.y(), dest.x())
    } else {
        from
    }
}

fn to_point(p: LatLon) -> Point<f64> {
    Point::new(p.lon, p.lat)
}

// ── Angle helpers ─────────────────────────────────────────────────────────────

/// Fold any heading into [0, 360).
pub fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Signed turn from `from` to `to`, in (-180, 180].
pub fn signed_angle(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Unsigned angular difference between two headings, in [0, 180].
pub fn heading_delta(a: f64, b: f64) -> f64 {
    signed_angle(a, b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(725.0), 5.0);
    }

    #[test]
    fn test_signed_angle_takes_short_way_round() {
        assert_eq!(signed_angle(350.0, 10.0), 20.0);
        assert_eq!(signed_angle(10.0, 350.0), -20.0);
        assert_eq!(signed_angle(0.0, 180.0), 180.0);
        assert_eq!(signed_angle(90.0, 270.0), 180.0);
    }

    #[test]
    fn test_heading_delta_is_symmetric() {
        assert_eq!(heading_delta(10.0, 300.0), 70.0);
        assert_eq!(heading_delta(300.0, 10.0), 70.0);
        assert_eq!(heading_delta(0.0, 95.0), 95.0);
    }

    #[test]
    fn test_direct_then_inverse_agree() {
        let origin = LatLon::new(45.0, 6.0);
        let dest = Wgs84.direct(origin, 60.0, 12_345.0).unwrap();
        let inv = Wgs84.inverse(origin, dest).unwrap();
        assert!((inv.distance - 12_345.0).abs() < 1e-3);
        assert!((inv.heading - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // ~111.2 km at mid latitudes on WGS84
        let d = Wgs84.distance(LatLon::new(45.0, 6.0), LatLon::new(46.0, 6.0));
        assert!((d - 111_141.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_spherical_estimate_never_returns_nan() {
        let inv = spherical_inverse(LatLon::new(f64::NAN, 6.0), LatLon::new(45.0, 6.0));
        assert!(inv.distance.is_finite());
        assert!(inv.heading.is_finite());

        let origin = LatLon::new(45.0, 6.0);
        assert_eq!(spherical_direct(origin, f64::NAN, 100.0), origin);
    }

    #[test]
    fn test_spherical_estimate_close_to_ellipsoid() {
        let (a, b) = (LatLon::new(45.0, 6.0), LatLon::new(45.1, 6.1));
        let spherical = spherical_inverse(a, b).distance;
        let ellipsoidal = Wgs84.distance(a, b);
        assert!((spherical - ellipsoidal).abs() / ellipsoidal < 0.01);
    }
}
