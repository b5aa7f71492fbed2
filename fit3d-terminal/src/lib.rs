//! Terminal front end: frames a scene with the camera fit calculator and
//! rasterises it to ASCII.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use fit3d_core::{
    fit::validate_fov, FitError, FpsCounter, FrameScheduler, PendingMesh, RotationState, ViewAxis,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;
pub mod scene;
pub mod viewer;

pub use renderer::AsciiRenderer;
pub use scene::{Actor, Scene};
pub use viewer::Viewer;

/// Rows reserved above the viewport for the status line
const STATUS_ROWS: u16 = 1;

/// Runtime settings for the terminal app
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fov_degrees: f32,
    pub fps: u32,
    /// Floor applied to fitted camera distances
    pub min_distance: f32,
    pub view_axis: ViewAxis,
    pub load_timeout: Option<Duration>,
    /// Companion cube angular velocity in radians per second
    pub spin: RotationState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            fps: 30,
            min_distance: 0.5,
            view_axis: ViewAxis::PosZ,
            load_timeout: None,
            spin: RotationState::new(0.3, 0.45, 0.0),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        validate_fov(self.fov_degrees)?;
        if !self.min_distance.is_finite() || self.min_distance < 0.0 {
            return Err(FitError::InvalidInput(format!(
                "minimum camera distance must be a non-negative number, got {}",
                self.min_distance
            )));
        }
        Ok(())
    }
}

/// Viewport size in cells for a terminal of `cols` x `rows`
fn viewport_size(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize, rows.saturating_sub(STATUS_ROWS) as usize)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    viewer: Viewer,
    renderer: AsciiRenderer,
    scheduler: FrameScheduler,
    fps: FpsCounter,
    running: bool,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: AppConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let (width, height) = viewport_size(cols, rows);
        let scheduler = FrameScheduler::new(config.fps);
        let viewer = Viewer::new(scene, config, width, height)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            viewer,
            renderer: AsciiRenderer::new(width, height),
            scheduler,
            fps: FpsCounter::new(),
            running: true,
        })
    }

    /// Render the current scene until `pending` delivers the real primary mesh
    pub fn with_pending_load(mut self, pending: PendingMesh) -> Self {
        self.viewer = self.viewer.with_pending_load(pending);
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame = self.scheduler.next_frame();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }

            self.viewer.poll_load();
            self.viewer.advance(frame.delta);
            self.render()?;

            if let Some(fps) = self.fps.record(Instant::now()) {
                tracing::trace!(fps, frame = frame.index, "frame rate");
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(cols, rows) => self.handle_resize(cols, rows),
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        let (dx, dy, dz) = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('f') => {
                let _ = self.viewer.refit();
                return;
            }
            KeyCode::Char('w') | KeyCode::Up => (0.1, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => (-0.1, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => (0.0, -0.1, 0.0),
            KeyCode::Char('d') | KeyCode::Right => (0.0, 0.1, 0.0),
            KeyCode::Char('e') => (0.0, 0.0, 0.1),
            KeyCode::Char('r') => (0.0, 0.0, -0.1),
            _ => return,
        };
        self.viewer.rotate_primary(dx, dy, dz);
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = viewport_size(cols, rows);
        tracing::debug!(width, height, "terminal resized");
        self.renderer.resize(width, height);
        self.viewer.resize(width, height);
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        for node in self.viewer.scene().nodes() {
            self.renderer.render_node(node, self.viewer.camera());
        }

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, STATUS_ROWS)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "fit3d | FPS: {:.1} | fov {:.0} | {} | WASD/Arrows=Rotate E/R=Roll F=Refit Q=Quit",
                self.fps.fps(),
                self.viewer.config().fov_degrees,
                self.viewer.status(),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::camera_viewport;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let config = AppConfig {
            fov_degrees: 0.0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(FitError::InvalidFov(_))));

        let config = AppConfig {
            min_distance: -1.0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_viewport_reserves_status_row() {
        assert_eq!(viewport_size(80, 24), (80, 23));
        assert_eq!(viewport_size(80, 0), (80, 0));
        assert_eq!(camera_viewport(80, 23), (80, 46));
    }
}
