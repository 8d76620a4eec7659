/// Terminal frontend for the software environment-map renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use canvas3d_core::{Config, FrameStats, Object, PixelBuffer, Renderer, RotationState};
use log::{debug, info};

pub mod cli;
pub mod presenter;
pub mod texture;

pub use cli::Cli;
pub use presenter::TerminalPresenter;

/// Angle added per key press, in radians.
const NUDGE: f32 = 0.1;

/// Owns the scene, its animation state and the buffers of one frame.
///
/// The core pipeline is stateless apart from its render context; the app
/// advances the rotation every tick and hands it to the renderer.
pub struct Scene {
    object: Object,
    rotation: RotationState,
    renderer: Renderer,
    frame: PixelBuffer,
    texture: PixelBuffer,
    config: Config,
}

impl Scene {
    pub fn new(object: Object, texture: PixelBuffer, config: Config) -> Self {
        let frame = PixelBuffer::filled(
            config.render.width,
            config.render.height,
            config.render.clear_color,
        );
        Self {
            object,
            rotation: RotationState::zero(),
            renderer: Renderer::from_config(&config.render),
            frame,
            texture,
            config,
        }
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RotationState {
        &mut self.rotation
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Advance the rotation by one tick of the configured angular speed.
    pub fn tick(&mut self) {
        self.rotation.advance(self.config.animation.speed);
    }

    /// Clear the frame and draw the object at the current rotation.
    pub fn render(&mut self) -> FrameStats {
        self.frame.clear(self.config.render.clear_color);
        self.renderer
            .render_frame(&self.object, &self.rotation, &mut self.frame, &self.texture)
    }
}

/// Main application struct for the interactive terminal view
pub struct TerminalApp {
    scene: Scene,
    presenter: TerminalPresenter,
    running: bool,
    paused: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    last_stats: FrameStats,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;

        Ok(Self {
            scene,
            presenter: presenter_for(columns, rows),
            running: true,
            paused: false,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            last_stats: FrameStats::default(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let tick = Duration::from_millis(self.scene.config().animation.tick_ms.max(1));
        info!("animating at one tick per {:?}", tick);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if !self.paused {
                self.scene.tick();
            }
            self.last_stats = self.scene.render();
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < tick {
                std::thread::sleep(tick - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(columns, rows) => {
                debug!("terminal resized to {}x{}", columns, rows);
                self.presenter = presenter_for(columns, rows);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let rotation = self.scene.rotation_mut();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
            }
            KeyCode::Char('w') | KeyCode::Up => rotation.rotate(NUDGE, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => rotation.rotate(-NUDGE, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => rotation.rotate(0.0, -NUDGE, 0.0),
            KeyCode::Char('d') | KeyCode::Right => rotation.rotate(0.0, NUDGE, 0.0),
            KeyCode::Char('e') => rotation.rotate(0.0, 0.0, NUDGE),
            KeyCode::Char('r') => rotation.rotate(0.0, 0.0, -NUDGE),
            _ => {}
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.presenter.sample(self.scene.frame());

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.presenter.draw(&mut stdout)?;

        // Status line
        let stats = &self.last_stats;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            SetBackgroundColor(Color::Reset),
            Print(format!(
                "Canvas3D | FPS: {:.1} | tris {}/{} | {}Space=Pause WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.fps,
                stats.drawn,
                stats.triangles,
                if self.paused { "PAUSED | " } else { "" },
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}

/// Presenter filling the terminal below the status line.
fn presenter_for(columns: u16, rows: u16) -> TerminalPresenter {
    TerminalPresenter::new(columns as usize, rows.saturating_sub(1).max(1) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas3d_core::{Mesh, Rgb};

    fn cube_scene() -> Scene {
        let mut config = Config::default();
        config.render.width = 64;
        config.render.height = 64;
        let object = Object::from(Mesh::cube(15.0));
        Scene::new(object, texture::phong_texture(32, Rgb::WHITE), config)
    }

    #[test]
    fn test_tick_advances_by_configured_speed() {
        let mut scene = cube_scene();
        scene.tick();
        scene.tick();
        let rotation = scene.rotation();
        assert!((rotation.x - 0.02).abs() < 1e-6);
        assert!((rotation.y - 0.026).abs() < 1e-6);
        assert!((rotation.z - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_render_clears_between_frames() {
        let mut scene = cube_scene();
        *scene.rotation_mut() = RotationState::new(0.4, 0.7, 0.1);
        let stats = scene.render();
        assert!(stats.drawn > 0);
        let first = scene.frame().clone();

        // Rendering the same pose again gives the same image
        let again = scene.render();
        assert_eq!(again, stats);
        assert_eq!(scene.frame(), &first);
    }

    #[test]
    fn test_presenter_leaves_room_for_status_line() {
        let presenter = presenter_for(80, 24);
        assert_eq!(presenter.columns(), 80);
        assert_eq!(presenter.rows(), 23);
        assert_eq!(presenter_for(10, 0).rows(), 1);
    }
}
