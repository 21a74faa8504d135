//! User pose and the orthonormal frames derived from it.
//!
//! Conventions: right-handed world, +Y up. The user's local frame has +X to
//! the right, +Y up and +Z along the view direction, so a 2D cursor offset
//! `(x, y)` names the point `(x, y, plane_distance)` in that frame.

use foundation::math::{Mat4, Plane, Vec2, Vec3};

/// Default "up" reference for building frames.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Substitute reference used when an axis is (nearly) parallel to `WORLD_UP`.
pub const ALTERNATE_UP: Vec3 = Vec3::X;

/// Cosine of the angle below which an axis counts as parallel to `WORLD_UP`
/// (about 2.5 degrees).
pub const DEGENERATE_UP_COS: f64 = 0.999;

/// Looking down -Z, the usual OpenGL convention.
pub const DEFAULT_VIEW_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Picks the up reference for a frame built around `axis`.
pub fn reference_up(axis: Vec3) -> Vec3 {
    if axis.dot(WORLD_UP).abs() > DEGENERATE_UP_COS {
        ALTERNATE_UP
    } else {
        WORLD_UP
    }
}

/// Rotation that draws a glyph flush with a surface.
///
/// The normal becomes the local Z axis, X is `up × normal` and Y completes the
/// right-handed frame. Translation is zero; callers place the glyph at the
/// selection position themselves.
pub fn surface_rotation(normal: Vec3) -> Mat4 {
    let n = normal.normalize().unwrap_or(Vec3::Z);
    let up = reference_up(n);
    let Some(x_axis) = up.cross(n).normalize() else {
        return Mat4::IDENTITY;
    };
    let y_axis = n.cross(x_axis);
    Mat4::from_basis(x_axis, y_axis, n, Vec3::ZERO)
}

/// Tracked head pose in SAR world coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UserPose {
    pub position: Vec3,
    /// Always unit length.
    view_direction: Vec3,
}

impl Default for UserPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            view_direction: DEFAULT_VIEW_DIRECTION,
        }
    }
}

impl UserPose {
    /// Returns `None` when `view_direction` cannot be normalized.
    pub fn new(position: Vec3, view_direction: Vec3) -> Option<Self> {
        Some(Self {
            position,
            view_direction: view_direction.normalize()?,
        })
    }

    pub fn view_direction(&self) -> Vec3 {
        self.view_direction
    }

    /// Replaces the view direction. Returns `false` (and keeps the old one)
    /// for zero or non-finite input.
    pub fn set_view_direction(&mut self, direction: Vec3) -> bool {
        match direction.normalize() {
            Some(d) => {
                self.view_direction = d;
                true
            }
            None => false,
        }
    }

    /// `(right, up, forward)` in world space.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.view_direction;
        let right = forward
            .cross(reference_up(forward))
            .normalize()
            .unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Maps local cursor-plane coordinates to world space.
    pub fn transform(&self) -> Mat4 {
        let (right, up, forward) = self.basis();
        Mat4::from_basis(right, up, forward, self.position)
    }

    /// The plane `distance` ahead of the user, facing along the view direction.
    pub fn cursor_plane(&self, distance: f64) -> Plane {
        Plane::new(
            self.position + self.view_direction * distance,
            self.view_direction,
        )
    }

    /// World point named by a 2D cursor offset on the plane at `distance`.
    pub fn local_to_world(&self, offset: Vec2, distance: f64) -> Vec3 {
        self.transform()
            .transform_point(Vec3::new(offset.x, offset.y, distance))
    }

    pub fn world_to_local(&self, p: Vec3) -> Vec3 {
        self.transform().rigid_inverse().transform_point(p)
    }
}
