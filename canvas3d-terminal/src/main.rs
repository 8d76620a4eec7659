/// Canvas3D Terminal Demo - environment-mapped mesh spinning in the terminal
///
/// Run with --help for the options.
/// Controls:
///   - Space: Pause the animation
///   - WASD / Arrow Keys: Rotate
///   - E/R: Roll rotation
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use canvas3d_core::{load_scene_file, Config, Mesh, Object, Rgb};
use canvas3d_terminal::{texture, Cli, Scene, TerminalApp};
use clap::Parser;
use log::info;

/// Edge length of the synthesized texture.
const TEXTURE_SIZE: usize = 128;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(scale) = args.scale {
        config.loader.scale = scale;
    }

    let object = match &args.scene {
        Some(path) => load_scene_file(path, &config.loader)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            // Edge of half the frame height keeps every corner on screen
            let size = config.render.height as f32 / 2.0;
            Object::from(Mesh::cube(size))
        }
    };
    info!(
        "scene: {} meshes, {} vertices, {} faces",
        object.meshes.len(),
        object.vertex_count(),
        object.face_count()
    );

    let texture = match &args.texture {
        Some(path) => texture::load_texture(path)?,
        None => {
            let tint = object.meshes.first().map(|m| m.tint).unwrap_or(Rgb::WHITE);
            texture::phong_texture(TEXTURE_SIZE, tint)
        }
    };

    let mut scene = Scene::new(object, texture, config);

    if let Some(path) = &args.snapshot {
        scene.tick();
        let stats = scene.render();
        info!(
            "snapshot: {} of {} triangles drawn, {} pixels",
            stats.drawn, stats.triangles, stats.raster.pixels_written
        );
        return texture::save_frame(scene.frame(), path);
    }

    let mut app = TerminalApp::new(scene).context("failed to query the terminal size")?;
    app.run().context("terminal session failed")?;

    println!("Thank you for using Canvas3D Terminal Renderer!");
    Ok(())
}
