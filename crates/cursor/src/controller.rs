//! Viewpoint cursor: maps relative 2D input onto surfaces in a projected
//! (SAR) environment.
//!
//! The cursor keeps a 2D offset on a virtual plane in front of the user. A ray
//! from the user's head through that offset picks the nearest `Selectable`;
//! when nothing is hit, the plane itself catches the ray so the cursor always
//! has somewhere to be drawn. When the head moves, the offset is re-derived
//! from the last 3D point so the projected cursor stays put.
//!
//! Resolution is lazy: mutators mark the cursor dirty and `get_cursor` does
//! the raycast at most once per dirty period.

use foundation::math::{Mat4, Vec2, Vec3, stable_total_cmp_f64};
use scene::picking::{Ray, Selectable, Selection, object_key};
use tracing::{debug, trace, warn};

use crate::config::CursorConfig;
use crate::frame::{UserPose, surface_rotation};

/// Controller state for a single logical cursor.
///
/// Not internally synchronized; confine calls to one thread (typically the
/// render/input loop).
#[derive(Debug, Clone)]
pub struct ViewpointCursor {
    config: CursorConfig,
    pose: UserPose,

    cursor_2d: Vec2,
    cursor_3d: Vec3,
    cursor_normal: Vec3,
    cursor_placed: bool,

    update_pending: bool,
    cached: CachedSelection,
}

/// A resolved selection detached from the caller's borrow.
#[derive(Debug, Copy, Clone, PartialEq)]
struct CachedSelection {
    pos: Vec3,
    normal: Vec3,
    rotation: Mat4,
    distance: f64,
    object: Option<ObjectRef>,
}

/// Where the winning object sat in the collection it was resolved against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ObjectRef {
    index: usize,
    key: usize,
}

impl CachedSelection {
    fn empty() -> Self {
        let miss = Selection::miss();
        Self {
            pos: miss.pos,
            normal: miss.normal,
            rotation: miss.rotation,
            distance: miss.distance,
            object: None,
        }
    }

    fn store(selection: &Selection<'_>, object: Option<ObjectRef>) -> Self {
        Self {
            pos: selection.pos,
            normal: selection.normal,
            rotation: selection.rotation,
            distance: selection.distance,
            object,
        }
    }

    /// Re-attaches the cached object to the caller's current collection.
    ///
    /// Returns `None` when the cached winner is no longer in `selectables`.
    fn bind<'s>(&self, selectables: &[&'s dyn Selectable]) -> Option<Selection<'s>> {
        let object = match self.object {
            Some(r) => Some(r.resolve(selectables)?),
            None => None,
        };
        Some(Selection {
            pos: self.pos,
            normal: self.normal,
            rotation: self.rotation,
            object,
            distance: self.distance,
        })
    }
}

impl ObjectRef {
    fn resolve<'s>(self, selectables: &[&'s dyn Selectable]) -> Option<&'s dyn Selectable> {
        if let Some(&s) = selectables.get(self.index) {
            if object_key(s) == self.key {
                return Some(s);
            }
        }
        selectables
            .iter()
            .copied()
            .find(|s| object_key(*s) == self.key)
    }
}

impl Default for ViewpointCursor {
    fn default() -> Self {
        Self::new(CursorConfig::default())
    }
}

impl ViewpointCursor {
    /// Falls back to `CursorConfig::default()` when `config` fails validation.
    pub fn new(config: CursorConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("{e}; using default cursor config");
                CursorConfig::default()
            }
        };
        let pose = UserPose::default();
        Self {
            config,
            pose,
            cursor_2d: Vec2::ZERO,
            cursor_3d: Vec3::ZERO,
            cursor_normal: -pose.view_direction(),
            cursor_placed: false,
            // The first query places the cursor straight ahead.
            update_pending: true,
            cached: CachedSelection::empty(),
        }
    }

    /// Shorthand for `new(CursorConfig::new(input_scale, invert_y))`.
    pub fn with_input(input_scale: f64, invert_y: bool) -> Self {
        Self::new(CursorConfig::new(input_scale, invert_y))
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    pub fn cursor_2d(&self) -> Vec2 {
        self.cursor_2d
    }

    pub fn cursor_3d(&self) -> Vec3 {
        self.cursor_3d
    }

    pub fn cursor_normal(&self) -> Vec3 {
        self.cursor_normal
    }

    pub fn is_placed(&self) -> bool {
        self.cursor_placed
    }

    pub fn is_update_pending(&self) -> bool {
        self.update_pending
    }

    pub fn user_pose(&self) -> &UserPose {
        &self.pose
    }

    pub fn user_position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn view_direction(&self) -> Vec3 {
        self.pose.view_direction()
    }

    /// Accumulates a relative device delta. The offset is unbounded.
    pub fn move_cursor(&mut self, dx: f64, dy: f64) {
        let scale = self.config.input_scale;
        let dy = if self.config.invert_y { -dy } else { dy };
        self.cursor_2d = self.cursor_2d + Vec2::new(dx * scale, dy * scale);
        self.update_pending = true;
    }

    /// Recenters the 2D offset on the view direction.
    pub fn reset_cursor(&mut self) {
        self.cursor_2d = Vec2::ZERO;
        self.update_pending = true;
    }

    /// The selection ray for the current offset and pose.
    ///
    /// `dir` is unit length.
    pub fn cursor_ray(&self) -> Ray {
        let origin = self.pose.position;
        let target = self
            .pose
            .local_to_world(self.cursor_2d, self.config.plane_distance);
        let dir = (target - origin)
            .normalize()
            .unwrap_or_else(|| self.pose.view_direction());
        Ray::new(origin, dir)
    }

    /// Resolves the cursor against `selectables`.
    ///
    /// Ordering contract:
    /// - The smallest strictly positive distance wins.
    /// - Equal distances go to the object encountered first.
    ///
    /// When nothing is hit the cursor lands on the fallback plane and
    /// `object` is `None`. Without an intervening mutator this returns the
    /// cached result, unless the cached object is missing from
    /// `selectables`, in which case the cursor is resolved again.
    pub fn get_cursor<'s>(&mut self, selectables: &[&'s dyn Selectable]) -> Selection<'s> {
        if !self.update_pending {
            if let Some(cached) = self.cached.bind(selectables) {
                return cached;
            }
            debug!("cached selection's object is gone; resolving again");
        }

        let ray = self.cursor_ray();
        trace!(
            "resolving cursor {:?} against {} selectables",
            self.cursor_2d,
            selectables.len()
        );

        let mut best: Option<(usize, Selection<'s>)> = None;
        for (index, &object) in selectables.iter().enumerate() {
            let hit = object.intersect(ray.origin, ray.dir);
            // Also filters NaN distances.
            if !(hit.distance > 0.0) {
                continue;
            }
            let closer = match &best {
                None => true,
                Some((_, b)) => stable_total_cmp_f64(hit.distance, b.distance).is_lt(),
            };
            if closer {
                best = Some((index, hit));
            }
        }
        self.update_pending = false;

        if let Some((index, mut hit)) = best {
            let object = selectables[index];
            self.cursor_placed = true;
            self.cursor_3d = hit.pos;
            self.cursor_normal = hit.normal;
            hit.rotation = self.get_cursor_rotation();
            hit.object = Some(object);
            self.cached = CachedSelection::store(
                &hit,
                Some(ObjectRef {
                    index,
                    key: object_key(object),
                }),
            );
            return hit;
        }

        debug!("no selectable hit; intersecting fallback plane");
        let forward = self.pose.view_direction();
        let plane = self.pose.cursor_plane(self.config.plane_distance);
        let Some(ip) = plane.intersect(ray.origin, ray.dir) else {
            warn!(
                "cursor ray {:?} is parallel to the fallback plane; keeping last selection",
                ray.dir
            );
            return self.cached.bind(selectables).unwrap_or_else(Selection::miss);
        };

        self.cursor_placed = true;
        self.cursor_3d = ip.point;
        self.cursor_normal = -forward;
        let selection = Selection {
            pos: ip.point,
            normal: self.cursor_normal,
            rotation: self.get_cursor_rotation(),
            object: None,
            distance: ip.t,
        };
        self.cached = CachedSelection::store(&selection, None);
        selection
    }

    /// Rotation that draws the cursor glyph flush with the current surface.
    pub fn get_cursor_rotation(&self) -> Mat4 {
        surface_rotation(self.cursor_normal)
    }

    /// Updates the tracked head position (SAR world coordinates) and keeps
    /// the projected cursor where it was.
    pub fn set_user_position(&mut self, position: Vec3) {
        if !position.is_finite() {
            warn!("ignoring non-finite user position {position:?}");
            return;
        }
        self.pose.position = position;
        self.update_pending = true;
        self.reverse_update();
    }

    /// Updates the view direction (SAR world coordinates) and keeps the
    /// projected cursor where it was.
    pub fn set_view_direction(&mut self, direction: Vec3) {
        if !self.pose.set_view_direction(direction) {
            warn!("ignoring degenerate view direction {direction:?}");
            return;
        }
        self.update_pending = true;
        self.reverse_update();
    }

    /// Re-derives the 2D offset so the ray from the current pose passes
    /// through the last resolved 3D point.
    fn reverse_update(&mut self) {
        if !self.cursor_placed {
            trace!("cursor not placed yet; nothing to preserve");
            return;
        }

        let position = self.pose.position;
        let Some(d) = (self.cursor_3d - position).normalize() else {
            warn!("user position coincides with the cursor; keeping 2D offset");
            return;
        };

        let plane = self.pose.cursor_plane(self.config.plane_distance);
        let Some(hit) = plane.intersect(position, d) else {
            warn!("cursor direction {d:?} is parallel to the view plane; keeping 2D offset");
            return;
        };
        if hit.t <= 0.0 {
            warn!("cursor is behind the viewpoint; keeping 2D offset");
            return;
        }

        let local = self.pose.world_to_local(hit.point);
        self.cursor_2d = Vec2::new(local.x, local.y);
        debug!("reverse projection moved 2D cursor to {:?}", self.cursor_2d);
    }
}
