//! View state behind the terminal app.
//!
//! `Viewer` owns the scene, the camera and any in-flight mesh load, and
//! decides when the camera is refitted: at construction, when a load
//! completes, on resize and on request. It never touches the terminal, so
//! the whole refit policy runs under plain unit tests.

use fit3d_core::{Camera, FitError, FitResult, LoadError, PendingMesh};
use std::time::{Duration, Instant};

use crate::{AppConfig, Scene};

/// Terminal cells are about twice as tall as they are wide
pub(crate) fn camera_viewport(width: usize, height: usize) -> (u32, u32) {
    (width as u32, height as u32 * 2)
}

pub struct Viewer {
    scene: Scene,
    config: AppConfig,
    camera: Camera,
    pending: Option<PendingMesh>,
    load_started: Instant,
    status: String,
}

impl Viewer {
    /// Frame `scene` for a viewport of `width` x `height` cells
    pub fn new(
        scene: Scene,
        config: AppConfig,
        width: usize,
        height: usize,
    ) -> Result<Self, FitError> {
        config.validate()?;

        let (cam_w, cam_h) = camera_viewport(width, height);
        let mut camera = Camera::new(cam_w, cam_h);
        camera.set_fov_degrees(config.fov_degrees);

        let mut viewer = Self {
            scene,
            config,
            camera,
            pending: None,
            load_started: Instant::now(),
            status: String::new(),
        };
        viewer.refit()?;
        Ok(viewer)
    }

    /// Keep showing the current scene until `pending` delivers the real primary mesh
    pub fn with_pending_load(self, pending: PendingMesh) -> Self {
        self.with_pending_load_at(pending, Instant::now())
    }

    /// Same as [`Viewer::with_pending_load`], with the load deadline counted from `started`
    pub fn with_pending_load_at(mut self, pending: PendingMesh, started: Instant) -> Self {
        self.status = format!("loading {}", pending.path().display());
        self.load_started = started;
        self.pending = Some(pending);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.scene.advance(elapsed);
    }

    pub fn rotate_primary(&mut self, dx: f32, dy: f32, dz: f32) {
        self.scene.primary.rotate(dx, dy, dz);
    }

    /// Track a new viewport size in cells and reframe for it
    pub fn resize(&mut self, width: usize, height: usize) {
        let (cam_w, cam_h) = camera_viewport(width, height);
        self.camera.set_viewport(cam_w, cam_h);
        // A failure is already on the status line
        let _ = self.refit();
    }

    /// Frame the whole scene. Runs on demand, not every frame.
    pub fn refit(&mut self) -> Result<FitResult, FitError> {
        let framing = self
            .scene
            .framing(self.config.fov_degrees, self.config.min_distance);
        match &framing {
            Ok(fit) => {
                self.camera.apply_fit(fit, self.config.view_axis);
                tracing::debug!(center = ?fit.center, distance = fit.distance, "camera refit");
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera refit failed");
                self.status = e.to_string();
            }
        }
        framing
    }

    pub fn poll_load(&mut self) -> Option<Result<usize, LoadError>> {
        self.poll_load_at(Instant::now())
    }

    /// Check the pending load as of `now`.
    ///
    /// Returns `None` while nothing has changed. A finished load swaps in the
    /// new primary mesh and refits, yielding its triangle count; a failure or
    /// an expired `load_timeout` keeps the current mesh.
    pub fn poll_load_at(&mut self, now: Instant) -> Option<Result<usize, LoadError>> {
        let pending = self.pending.as_mut()?;

        let outcome = match pending.poll() {
            Some(outcome) => outcome,
            None => match self.config.load_timeout {
                Some(timeout) if now.saturating_duration_since(self.load_started) >= timeout => {
                    Err(LoadError::LoadTimeout {
                        path: pending.path().to_path_buf(),
                        timeout,
                    })
                }
                _ => return None,
            },
        };
        self.pending = None;

        Some(match outcome {
            Ok(mesh) => {
                let triangles = mesh.triangles.len();
                self.status = format!("{} triangles", triangles);
                self.scene.replace_primary(mesh);
                let _ = self.refit();
                Ok(triangles)
            }
            Err(e) => {
                tracing::warn!(error = %e, "keeping placeholder mesh");
                self.status = e.to_string();
                Err(e)
            }
        })
    }
}
