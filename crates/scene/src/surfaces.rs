//! Concrete `Selectable` surfaces for projected SAR geometry.
//!
//! All surfaces report normals facing the ray origin, so a cursor glyph
//! oriented along the normal is always visible from the viewpoint.

use foundation::bounds::Aabb3;
use foundation::math::{Plane, Vec3};

use crate::picking::{Ray, Selectable, Selection};

/// Rays closer to parallel than this are skipped on that slab axis.
const SLAB_EPSILON: f64 = 1e-12;

/// Infinite, two-sided planar surface (a wall, a table top).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaneSurface {
    pub plane: Plane,
}

impl PlaneSurface {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            plane: Plane::new(point, normal),
        }
    }
}

impl Selectable for PlaneSurface {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Selection<'_> {
        let Some(hit) = self.plane.intersect(origin, direction) else {
            return Selection::miss();
        };
        if hit.t < 0.0 {
            return Selection::miss();
        }
        let Some(n) = self.plane.normal.normalize() else {
            return Selection::miss();
        };
        Selection::hit(hit.point, facing(n, direction), hit.t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereSurface {
    pub center: Vec3,
    pub radius: f64,
}

impl SphereSurface {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Selectable for SphereSurface {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Selection<'_> {
        let a = direction.length_squared();
        if a <= 0.0 || self.radius <= 0.0 {
            return Selection::miss();
        }

        let oc = origin - self.center;
        let half_b = oc.dot(direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 {
            return Selection::miss();
        }

        let sqrt_d = disc.sqrt();
        let near = (-half_b - sqrt_d) / a;
        let far = (-half_b + sqrt_d) / a;
        // From inside the sphere only the far root is ahead of us.
        let t = if near >= 0.0 {
            near
        } else if far >= 0.0 {
            far
        } else {
            return Selection::miss();
        };

        let pos = Ray::new(origin, direction).at(t);
        let outward = (pos - self.center) * (1.0 / self.radius);
        Selection::hit(pos, facing(outward, direction), t)
    }
}

/// Axis-aligned box, e.g. a physical prop the projectors light up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxSurface {
    pub bounds: Aabb3,
}

impl BoxSurface {
    pub fn new(bounds: Aabb3) -> Self {
        Self { bounds }
    }
}

impl Selectable for BoxSurface {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Selection<'_> {
        let Some((t, axis)) = ray_aabb_hit(origin.as_array(), direction.as_array(), &self.bounds)
        else {
            return Selection::miss();
        };

        let d = direction.as_array();
        let mut normal = [0.0; 3];
        normal[axis] = if d[axis] > 0.0 { -1.0 } else { 1.0 };
        Selection::hit(Ray::new(origin, direction).at(t), Vec3::from(normal), t)
    }
}

/// Slab test returning the first non-negative crossing and the axis of the
/// face it crosses. Rays starting inside report the exit face.
fn ray_aabb_hit(origin: [f64; 3], dir: [f64; 3], bounds: &Aabb3) -> Option<(f64, usize)> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    let mut enter_axis = None;
    let mut exit_axis = None;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (min, max) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < SLAB_EPSILON {
            if o < min || o > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min - o) * inv;
        let mut t2 = (max - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        if t1 > t_min {
            t_min = t1;
            enter_axis = Some(axis);
        }
        if t2 < t_max {
            t_max = t2;
            exit_axis = Some(axis);
        }
        if t_max < t_min {
            return None;
        }
    }

    if t_min >= 0.0 {
        enter_axis.map(|axis| (t_min, axis))
    } else if t_max >= 0.0 {
        exit_axis.map(|axis| (t_max, axis))
    } else {
        None
    }
}

fn facing(normal: Vec3, direction: Vec3) -> Vec3 {
    if normal.dot(direction) > 0.0 {
        -normal
    } else {
        normal
    }
}
