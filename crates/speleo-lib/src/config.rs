use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::path::DistanceMode;

/// Environment variable pointing at a render configuration file.
pub const CONFIG_ENV_VAR: &str = "SPELEO_CONFIG";

/// Default filename inside the platform configuration directory.
const CONFIG_FILENAME: &str = "config.json";

/// How segments are colored for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Every segment uses the global color.
    #[default]
    #[serde(rename = "global")]
    Global,
    /// Gradient by station elevation.
    #[serde(rename = "gradientByZ")]
    GradientByZ,
    /// Gradient by centerline distance from a reference station.
    #[serde(rename = "gradientByDistance")]
    GradientByDistance,
    /// One color for the whole cave.
    #[serde(rename = "percave")]
    PerCave,
    /// One color per survey.
    #[serde(rename = "persurvey")]
    PerSurvey,
}

/// Rendering options consumed by [`crate::segment_colors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub color_mode: ColorMode,
    pub global_color: Color,
    pub cave_color: Color,
    pub survey_colors: BTreeMap<String, Color>,
    pub gradient_start: Color,
    pub gradient_end: Color,
    /// Reference station for distance gradients; defaults to the first
    /// resolved station of the first visible survey.
    pub distance_reference: Option<String>,
    pub distance_mode: DistanceMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Global,
            global_color: Color::WHITE,
            cave_color: Color::new(0.933, 0.733, 0.267),
            survey_colors: BTreeMap::new(),
            gradient_start: Color::new(0.224, 0.694, 0.302),
            gradient_end: Color::new(0.616, 0.165, 0.165),
            distance_reference: None,
            distance_mode: DistanceMode::Traversal,
        }
    }
}

/// Resolve the default configuration location using platform-specific project directories.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "speleo", "speleo").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load the render configuration.
///
/// The resolution order is:
/// 1. Explicit `path` argument when provided (must exist).
/// 2. `SPELEO_CONFIG` environment variable (must exist).
/// 3. `config.json` in the platform configuration directory, if present.
/// 4. Built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    if let Some(explicit) = path {
        return read_config(explicit);
    }

    if let Some(env_path) = env::var_os(CONFIG_ENV_VAR) {
        return read_config(Path::new(&env_path));
    }

    match default_config_path() {
        Ok(default) if default.exists() => read_config(&default),
        Ok(_) | Err(Error::ProjectDirsUnavailable) => {
            debug!("no render configuration found; using defaults");
            Ok(RenderConfig::default())
        }
        Err(error) => Err(error),
    }
}

fn read_config(path: &Path) -> Result<RenderConfig> {
    debug!(path = %path.display(), "loading render configuration");
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: RenderConfig = serde_json::from_str(
            r##"{"colorMode":"gradientByDistance","gradientStart":"#000000","distanceMode":"shortest"}"##,
        )
        .expect("valid config");

        assert_eq!(config.color_mode, ColorMode::GradientByDistance);
        assert_eq!(config.gradient_start, Color::new(0.0, 0.0, 0.0));
        assert_eq!(config.distance_mode, DistanceMode::Shortest);
        assert_eq!(config.global_color, Color::WHITE);
    }

    #[test]
    fn color_modes_use_renderer_names() {
        for (mode, name) in [
            (ColorMode::Global, "\"global\""),
            (ColorMode::GradientByZ, "\"gradientByZ\""),
            (ColorMode::GradientByDistance, "\"gradientByDistance\""),
            (ColorMode::PerCave, "\"percave\""),
            (ColorMode::PerSurvey, "\"persurvey\""),
        ] {
            assert_eq!(serde_json::to_string(&mode).unwrap(), name);
        }
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_config(Some(&missing)), Err(Error::Io(_))));

        let present = dir.path().join("render.json");
        fs::write(&present, r#"{"colorMode":"percave"}"#).unwrap();
        let config = load_config(Some(&present)).expect("config loads");
        assert_eq!(config.color_mode, ColorMode::PerCave);
    }
}
