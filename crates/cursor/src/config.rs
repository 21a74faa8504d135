use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Distance of the fallback / reference plane ahead of the user, in world
/// units. Only needs to be far enough to look plausible when nothing is hit.
pub const DEFAULT_PLANE_DISTANCE: f64 = 10_000.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cursor config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid cursor config: {0}")]
    Invalid(String),
}

/// Construction options for a `ViewpointCursor`.
///
/// Missing JSON fields take their defaults.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Multiplier applied to every raw 2D delta before accumulation.
    pub input_scale: f64,
    /// Subtract the Y delta instead of adding it. Whether this is needed
    /// depends on how the projectors were calibrated.
    pub invert_y: bool,
    pub plane_distance: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            input_scale: 1.0,
            invert_y: false,
            plane_distance: DEFAULT_PLANE_DISTANCE,
        }
    }
}

impl CursorConfig {
    pub fn new(input_scale: f64, invert_y: bool) -> Self {
        Self {
            input_scale,
            invert_y,
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "input_scale must be finite, got {}",
                self.input_scale
            )));
        }
        if !(self.plane_distance.is_finite() && self.plane_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "plane_distance must be a positive finite number, got {}",
                self.plane_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CursorConfig, DEFAULT_PLANE_DISTANCE};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_options() {
        let c = CursorConfig::default();
        assert_eq!(c.input_scale, 1.0);
        assert!(!c.invert_y);
        assert_eq!(c.plane_distance, DEFAULT_PLANE_DISTANCE);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = CursorConfig::from_json_str(r#"{ "invert_y": true }"#).expect("parse");
        assert_eq!(c, CursorConfig::new(1.0, true));

        let c = CursorConfig::from_json_str(r#"{ "input_scale": 0.5, "plane_distance": 250.0 }"#)
            .expect("parse");
        assert_eq!(c.input_scale, 0.5);
        assert_eq!(c.plane_distance, 250.0);
    }

    #[test]
    fn rejects_non_positive_plane_distance() {
        let err = CursorConfig::from_json_str(r#"{ "plane_distance": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CursorConfig::from_json_str("{ input_scale: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{ "input_scale": 2.0 }}"#).expect("write");
        let c = CursorConfig::load(file.path()).expect("load");
        assert_eq!(c.input_scale, 2.0);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            CursorConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
