//! Background mesh loading.
//!
//! A load runs on its own thread and hands the result back through a
//! channel. The frame loop polls [`PendingMesh::poll`] once per frame and
//! carries on rendering whatever is already in the scene until the mesh
//! arrives; command-line style callers can block with [`PendingMesh::wait`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::geometry::Mesh;
use crate::stl::{self, StlError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load {}: {reason}", path.display())]
    LoadFailed { path: PathBuf, reason: String },
    #[error("loading {} timed out after {timeout:?}", path.display())]
    LoadTimeout { path: PathBuf, timeout: Duration },
    #[error("loader thread for {} exited without a result", path.display())]
    Disconnected { path: PathBuf },
}

impl LoadError {
    fn failed(path: &Path, reason: impl ToString) -> Self {
        LoadError::LoadFailed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Read and parse an STL file on the calling thread.
pub fn load_mesh(path: &Path) -> Result<Mesh, LoadError> {
    let data = std::fs::read(path).map_err(|e| LoadError::failed(path, e))?;
    stl::parse_stl(&data).map_err(|e: StlError| LoadError::failed(path, e))
}

/// Spawns mesh loads onto background threads.
pub struct MeshLoader;

impl MeshLoader {
    pub fn spawn(path: impl Into<PathBuf>) -> PendingMesh {
        let (tx, pending) = PendingMesh::channel(path);
        let path = pending.path.clone();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("fit3d-mesh-loader".to_string())
            .spawn(move || {
                let result = load_mesh(&worker_path);
                // The receiver may already be gone if the caller gave up
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            tracing::warn!(path = %path.display(), error = %e, "could not start loader thread");
        } else {
            tracing::debug!(path = %path.display(), "mesh load started");
        }

        pending
    }
}

/// Handle to an in-flight mesh load.
pub struct PendingMesh {
    path: PathBuf,
    rx: Receiver<Result<Mesh, LoadError>>,
    finished: bool,
}

impl PendingMesh {
    /// Pending load for `path` fed by whoever holds the returned sender.
    ///
    /// Dropping the sender without sending reports [`LoadError::Disconnected`].
    pub fn channel(path: impl Into<PathBuf>) -> (Sender<Result<Mesh, LoadError>>, PendingMesh) {
        let (tx, rx) = mpsc::channel();
        let pending = PendingMesh {
            path: path.into(),
            rx,
            finished: false,
        };
        (tx, pending)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check. Yields the outcome exactly once.
    pub fn poll(&mut self) -> Option<Result<Mesh, LoadError>> {
        if self.finished {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Disconnected {
                path: self.path.clone(),
            }),
        };
        self.finished = true;
        Some(self.report(outcome))
    }

    /// Block until the load finishes or `timeout` elapses.
    pub fn wait(self, timeout: Duration) -> Result<Mesh, LoadError> {
        let outcome = match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(LoadError::LoadTimeout {
                path: self.path.clone(),
                timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(LoadError::Disconnected {
                path: self.path.clone(),
            }),
        };
        self.report(outcome)
    }

    fn report(&self, outcome: Result<Mesh, LoadError>) -> Result<Mesh, LoadError> {
        match &outcome {
            Ok(mesh) => tracing::info!(
                path = %self.path.display(),
                triangles = mesh.triangles.len(),
                "mesh loaded"
            ),
            Err(e) => tracing::warn!(error = %e, "mesh load failed"),
        }
        outcome
    }
}
