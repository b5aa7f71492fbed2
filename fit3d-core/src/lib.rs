//! fit3d core: stateless geometry for framing 3D scenes.
//!
//! The camera fit calculator (`fit`) merges the world bounds of a set of
//! scene objects and works out how far a perspective camera must sit to see
//! all of them. Around it live the mesh, camera, transform and STL pieces a
//! renderer needs, plus background mesh loading and frame scheduling.

pub mod bounds;
pub mod fit;
pub mod geometry;
pub mod loader;
pub mod projection;
pub mod schedule;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use bounds::BoundingBox;
pub use fit::{fit_camera, union_bounds, union_with, FitError, FitResult, SceneObject, ViewAxis};
pub use geometry::{Mesh, SceneNode, Triangle, Vertex};
pub use loader::{LoadError, MeshLoader, PendingMesh};
pub use projection::{Camera, ProjectionMode};
pub use schedule::{FpsCounter, FrameRequest, FrameScheduler};
pub use transform::{RotationState, Transform};
