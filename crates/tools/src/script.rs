//! Session scripts: a scene plus a recorded stream of input and tracking
//! events, replayed through a `ViewpointCursor`.
//!
//! ```json
//! {
//!   "config": { "input_scale": 0.5, "invert_y": true },
//!   "surfaces": [
//!     { "name": "wall", "kind": "plane",
//!       "point": { "x": 0, "y": 0, "z": -3 }, "normal": { "x": 0, "y": 0, "z": 1 } },
//!     { "kind": "box", "min": [-1, -1, -2], "max": [1, 1, -1] }
//!   ],
//!   "events": [
//!     { "move": { "dx": 12, "dy": -4 } },
//!     { "user_position": { "x": 0.2, "y": 1.6, "z": 0 } },
//!     "resolve"
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use cursor::{ConfigError, CursorConfig, ViewpointCursor};
use foundation::bounds::Aabb3;
use foundation::math::Vec3;
use scene::picking::{Selectable, Selection, object_key};
use scene::surfaces::{BoxSurface, PlaneSurface, SphereSurface};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("script json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("surface {index}: {reason}")]
    InvalidSurface { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: CursorConfig,
    #[serde(default)]
    pub surfaces: Vec<SurfaceSpec>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub shape: SurfaceShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceShape {
    Plane { point: Vec3, normal: Vec3 },
    Sphere { center: Vec3, radius: f64 },
    Box { min: [f64; 3], max: [f64; 3] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Move { dx: f64, dy: f64 },
    UserPosition(Vec3),
    ViewDirection(Vec3),
    Reset,
    Resolve,
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    /// Index of the `resolve` event in the script.
    pub event: usize,
    pub pos: [f64; 3],
    pub normal: [f64; 3],
    pub rotation: [[f64; 4]; 4],
    /// Index into `surfaces`, or `None` for the fallback plane.
    pub object: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub distance: f64,
}

impl Script {
    pub fn from_json_str(s: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(s)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn build_surfaces(&self) -> Result<Vec<Box<dyn Selectable>>, ScriptError> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.build(index))
            .collect()
    }

    /// Replays every event in order and collects one result per `resolve`.
    pub fn replay(&self) -> Result<Vec<ResolvedSelection>, ScriptError> {
        let surfaces = self.build_surfaces()?;
        let refs: Vec<&dyn Selectable> = surfaces.iter().map(|s| s.as_ref()).collect();
        let mut cursor = ViewpointCursor::new(self.config);
        let mut out = Vec::new();

        for (event_index, event) in self.events.iter().enumerate() {
            match event {
                Event::Move { dx, dy } => cursor.move_cursor(*dx, *dy),
                Event::UserPosition(p) => cursor.set_user_position(*p),
                Event::ViewDirection(d) => cursor.set_view_direction(*d),
                Event::Reset => cursor.reset_cursor(),
                Event::Resolve => {
                    let selection = cursor.get_cursor(&refs);
                    out.push(self.describe(event_index, &selection, &refs));
                }
            }
        }

        info!(
            "replayed {} events, {} resolutions",
            self.events.len(),
            out.len()
        );
        Ok(out)
    }

    fn describe(
        &self,
        event: usize,
        selection: &Selection<'_>,
        refs: &[&dyn Selectable],
    ) -> ResolvedSelection {
        let object = selection.object.and_then(|o| {
            let key = object_key(o);
            refs.iter().position(|r| object_key(*r) == key)
        });
        let name = object.and_then(|i| self.surfaces.get(i)?.name.clone());
        ResolvedSelection {
            event,
            pos: selection.pos.as_array(),
            normal: selection.normal.as_array(),
            rotation: selection.rotation.cols,
            object,
            name,
            distance: selection.distance,
        }
    }
}

impl SurfaceSpec {
    fn build(&self, index: usize) -> Result<Box<dyn Selectable>, ScriptError> {
        let invalid = |reason: &str| ScriptError::InvalidSurface {
            index,
            reason: reason.to_string(),
        };
        match &self.shape {
            SurfaceShape::Plane { point, normal } => {
                let normal = normal
                    .normalize()
                    .ok_or_else(|| invalid("plane normal must be non-zero"))?;
                Ok(Box::new(PlaneSurface::new(*point, normal)))
            }
            SurfaceShape::Sphere { center, radius } => {
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(invalid("sphere radius must be positive"));
                }
                Ok(Box::new(SphereSurface::new(*center, *radius)))
            }
            SurfaceShape::Box { min, max } => {
                Ok(Box::new(BoxSurface::new(Aabb3::from_corners(*min, *max))))
            }
        }
    }
}
