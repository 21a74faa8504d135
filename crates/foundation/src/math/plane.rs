//! Infinite plane primitive used for fallback and reference intersections.

use super::Vec3;

/// `|direction · normal|` below this is treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// An infinite plane given by a point on it and its normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Where a ray meets a plane.
///
/// `t` is the ray parameter: `point == origin + direction * t`. It is negative
/// when the plane lies behind the ray origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaneHit {
    pub point: Vec3,
    pub t: f64,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Solves the ray-plane equation.
    ///
    /// Returns `None` only when the ray is (numerically) parallel to the plane.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<PlaneHit> {
        let denom = direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON || !denom.is_finite() {
            return None;
        }

        let t = (self.point - origin).dot(self.normal) / denom;
        Some(PlaneHit {
            point: origin + direction * t,
            t,
        })
    }

    /// Signed distance from `p` to the plane, in units of `|normal|`.
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        (p - self.point).dot(self.normal)
    }
}
