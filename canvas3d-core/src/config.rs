/// Configuration for loading, rendering and animating a scene
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```toml
/// [loader]
/// scale = 8.0
/// tint = "last-parsed"
///
/// [animation]
/// speed = [0.0, 0.02, 0.0]
/// ```
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a loaded mesh takes its tint from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TintSource {
    /// The material named by the mesh's MATERIAL_REF, or the last material
    /// when the reference is out of range
    #[default]
    Referenced,
    /// The last material in the file, whatever the mesh references.
    /// Matches older exporters' output byte for byte.
    LastParsed,
}

/// Painter's-algorithm ordering of triangles by their summed rotated z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthOrder {
    /// Largest key first: with the viewer looking down +z that is back to front
    #[default]
    FarFirst,
    /// Smallest key first
    AscendingKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Multiplier applied to every vertex position
    pub scale: f32,
    pub tint: TintSource,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            scale: 11.0,
            tint: TintSource::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame size in pixels; the terminal scales frames to the window
    pub width: usize,
    pub height: usize,
    pub depth_order: DepthOrder,
    pub clear_color: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 96,
            depth_order: DepthOrder::default(),
            clear_color: [0, 0, 0, 255],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Radians added to the x, y and z angles every tick
    pub speed: [f32; 3],
    pub tick_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: [0.01, 0.013, 0.02],
            tick_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderConfig,
    pub render: RenderConfig,
    pub animation: AnimationConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
