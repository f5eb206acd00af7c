/// Terminal front end: drives a scene and draws it as ASCII art
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use snowgl_core::{Geometry, MathError, Real};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;
pub mod scene;

pub use renderer::AsciiRenderer;
pub use scene::{Scene, SceneConfig};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: Real = 0.5;

/// Mesh rotation applied per key press, in radians
const KEY_ROTATION: Real = 0.1;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(geometry: Geometry, config: SceneConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let aspect = width as Real / height.max(1) as Real * CELL_ASPECT;
        let scene = Scene::new(geometry, &config, aspect).map_err(invalid_scene)?;

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / config.target_fps.max(1)),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
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
        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.scene.step();

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        log::info!("render loop stopped");
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind == KeyEventKind::Release {
                return Ok(());
            }
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Left => self.scene.strafe_camera(-1.0),
                KeyCode::Right => self.scene.strafe_camera(1.0),
                KeyCode::Char('w') => self.scene.mesh.rotate(KEY_ROTATION, [1.0, 0.0, 0.0]),
                KeyCode::Char('s') => self.scene.mesh.rotate(-KEY_ROTATION, [1.0, 0.0, 0.0]),
                KeyCode::Char('a') => self.scene.mesh.rotate(-KEY_ROTATION, [0.0, 1.0, 0.0]),
                KeyCode::Char('d') => self.scene.mesh.rotate(KEY_ROTATION, [0.0, 1.0, 0.0]),
                KeyCode::Char('e') => self.scene.mesh.rotate(KEY_ROTATION, [0.0, 0.0, 1.0]),
                KeyCode::Char('r') => self.scene.mesh.rotate(-KEY_ROTATION, [0.0, 0.0, 1.0]),
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render(&self.scene);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "snowgl | FPS: {:.1} | WASD/E/R=Rotate Left/Right=Move camera Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn invalid_scene(err: MathError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("invalid scene: {}", err))
}
