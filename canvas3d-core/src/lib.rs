/// Canvas3D Core Library - software rendering of environment-mapped meshes
///
/// This library loads ASCII scene exports into a mesh model and draws them
/// into RGBA pixel buffers: per-frame rotation, backface culling, painter's
/// ordering and scanline rasterization with affine texture mapping.

pub mod buffer;
pub mod config;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod scanner;
pub mod transform;

// Re-export commonly used types
pub use buffer::PixelBuffer;
pub use config::{Config, DepthOrder, LoaderConfig, RenderConfig, TintSource};
pub use error::{BufferError, ConfigError, LoadError, MeshDefect, ScanError};
pub use geometry::Vector3;
pub use loader::{load_scene, load_scene_file, SceneLoader};
pub use mesh::{Face, Material, Mesh, Object, Outline, Rgb};
pub use pipeline::{FrameStats, Renderer};
pub use transform::{Rotation, RotationState};
