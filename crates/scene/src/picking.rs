use foundation::math::{Mat4, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// A scene surface that can be tested against a selection ray.
///
/// Contract for `intersect`:
/// - No hit: return a Selection with `distance < 0` (see [`Selection::miss`]).
/// - Hit: `distance >= 0` is the ray parameter of the nearest hit, so closer
///   hits have smaller distances; `pos` and `normal` must be populated.
///
/// Implementations are free to leave `object` empty; the cursor fills it in
/// with the reference it was handed.
pub trait Selectable {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Selection<'_>;
}

/// The resolved raycast result.
///
/// `object` borrows the selected scene object from the caller's collection
/// and is only valid while that collection is. `None` means the cursor rests
/// on the fallback plane rather than a real object.
#[derive(Copy, Clone)]
pub struct Selection<'s> {
    /// Selected position in world coordinates.
    pub pos: Vec3,
    /// Surface normal at `pos`.
    pub normal: Vec3,
    /// Rotation that draws a glyph flush with the surface. No translation.
    pub rotation: Mat4,
    pub object: Option<&'s dyn Selectable>,
    /// Ray parameter of the hit; negative means no intersection.
    pub distance: f64,
}

impl<'s> Selection<'s> {
    pub fn miss() -> Self {
        Self {
            pos: Vec3::ZERO,
            normal: Vec3::ZERO,
            rotation: Mat4::IDENTITY,
            object: None,
            distance: -1.0,
        }
    }

    pub fn hit(pos: Vec3, normal: Vec3, distance: f64) -> Self {
        Self {
            pos,
            normal,
            rotation: Mat4::IDENTITY,
            object: None,
            distance,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.distance >= 0.0
    }

    /// Whether this selection rests on `candidate` (pointer identity).
    pub fn is_object(&self, candidate: &dyn Selectable) -> bool {
        self.object
            .is_some_and(|o| object_key(o) == object_key(candidate))
    }
}

impl std::fmt::Debug for Selection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("pos", &self.pos)
            .field("normal", &self.normal)
            .field("rotation", &self.rotation)
            .field("object", &self.object.map(object_key))
            .field("distance", &self.distance)
            .finish()
    }
}

impl PartialEq for Selection<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
            && self.normal == other.normal
            && self.rotation == other.rotation
            && self.object.map(object_key) == other.object.map(object_key)
            && self.distance == other.distance
    }
}

/// Address of a selectable, used as an identity key. Never dereferenced.
pub fn object_key(s: &dyn Selectable) -> usize {
    (s as *const dyn Selectable).cast::<()>() as usize
}
