/// Example: Load an ASE scene and show it in the terminal
///
/// Usage: cargo run --example load_scene -- path/to/scene.ase [texture.png]
use std::env;

use anyhow::{Context, Result};
use canvas3d_core::{load_scene_file, Config, Rgb};
use canvas3d_terminal::{texture, Scene, TerminalApp};

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let scene_path = match args.get(1) {
        Some(path) => path.clone(),
        None => {
            eprintln!("Usage: {} <scene.ase> [texture.png]", args[0]);
            eprintln!("\nNo scene provided, using scenes/cube.ase...");
            concat!(env!("CARGO_MANIFEST_DIR"), "/../scenes/cube.ase").to_string()
        }
    };

    let config = Config::default();
    println!("Loading scene: {}", scene_path);
    let object = load_scene_file(&scene_path, &config.loader)
        .with_context(|| format!("failed to load {}", scene_path))?;
    println!(
        "Loaded {} meshes with {} faces",
        object.meshes.len(),
        object.face_count()
    );

    let texture = match args.get(2) {
        Some(path) => texture::load_texture(path)?,
        None => {
            let tint = object.meshes.first().map(|m| m.tint).unwrap_or(Rgb::WHITE);
            texture::phong_texture(128, tint)
        }
    };

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(Scene::new(object, texture, config))?;
    app.run()?;
    Ok(())
}
