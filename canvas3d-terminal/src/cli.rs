/// Command line of the terminal renderer
use std::path::PathBuf;

use clap::Parser;

/// Spin an environment-mapped mesh in the terminal.
///
/// Without a scene file a built-in cube is shown. Without a texture a lit
/// sphere texture is synthesized from the first mesh's tint.
#[derive(Debug, Parser)]
#[command(name = "canvas3d-terminal", version)]
pub struct Cli {
    /// ASE scene file to load
    pub scene: Option<PathBuf>,

    /// PNG, JPEG or BMP environment texture
    #[arg(long, value_name = "IMAGE")]
    pub texture: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Vertex scale, overriding the configured one
    #[arg(long, value_name = "F")]
    pub scale: Option<f32>,

    /// Render a single frame to this image file and exit
    #[arg(long, value_name = "OUT.png")]
    pub snapshot: Option<PathBuf>,
}
