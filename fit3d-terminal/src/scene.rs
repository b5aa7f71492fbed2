//! The demo scene: a primary mesh plus a spinning companion cube

use std::time::Duration;

use fit3d_core::{
    fit_camera, union_with, BoundingBox, FitError, FitResult, Mesh, RotationState, SceneNode,
    SceneObject, Transform,
};
use nalgebra::Vector3;

/// A scene node with its own placement and spin
#[derive(Debug, Clone)]
pub struct Actor {
    pub node: SceneNode,
    pub translation: Vector3<f32>,
    pub scale: f32,
    pub rotation: RotationState,
    /// Angular velocity in radians per second
    pub spin: RotationState,
}

impl Actor {
    pub fn new(mesh: Mesh) -> Self {
        let mut actor = Self {
            node: SceneNode::new(mesh),
            translation: Vector3::zeros(),
            scale: 1.0,
            rotation: RotationState::zero(),
            spin: RotationState::zero(),
        };
        actor.sync();
        actor
    }

    /// Rebuild the node's model matrix from the placement
    pub fn sync(&mut self) {
        self.node.transform =
            Transform::model_matrix(&self.translation, &self.rotation, self.scale);
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.rotation.advance(&self.spin, elapsed);
        self.sync();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
        self.sync();
    }
}

impl SceneObject for Actor {
    fn world_bounds(&self) -> BoundingBox {
        self.node.world_bounds()
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub primary: Actor,
    pub additional: Vec<Actor>,
    companion_spin: RotationState,
}

impl Scene {
    /// Place `primary` at the origin with a cube spinning beside it
    pub fn new(primary: Mesh, companion_spin: RotationState) -> Self {
        let mut scene = Self {
            primary: Actor::new(primary),
            additional: Vec::new(),
            companion_spin,
        };
        scene.place_companion();
        scene
    }

    /// Swap in a newly loaded primary mesh, keeping its current orientation
    pub fn replace_primary(&mut self, mesh: Mesh) {
        self.primary.node.mesh = mesh;
        self.primary.sync();
        self.place_companion();
    }

    fn place_companion(&mut self) {
        let local = self
            .primary
            .node
            .mesh
            .bounds()
            .unwrap_or_else(|| BoundingBox::point(nalgebra::Point3::origin()));
        let extent = local.max_extent();
        let size = if extent > 0.0 { extent * 0.5 } else { 1.0 };

        // Right of the primary with a one-cube gap
        let center = local.center();
        let mut cube = Actor::new(Mesh::cube(size));
        cube.translation = Vector3::new(local.max.x + size * 1.5, center.y, center.z);
        cube.spin = self.companion_spin;
        cube.sync();

        self.additional = vec![cube];
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.primary.advance(elapsed);
        for actor in &mut self.additional {
            actor.advance(elapsed);
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        std::iter::once(&self.primary.node).chain(self.additional.iter().map(|a| &a.node))
    }

    pub fn bounds(&self) -> BoundingBox {
        union_with(&self.primary, &self.additional)
    }

    /// Camera framing for the current pose, never closer than `min_distance`
    pub fn framing(&self, fov_degrees: f32, min_distance: f32) -> Result<FitResult, FitError> {
        let bounds = self.bounds();
        let fit = fit_camera(&bounds, fov_degrees)?;
        // Keep the near face of the union in front of the camera as well
        let depth_margin = bounds.max_extent() * 0.5;
        Ok(FitResult {
            distance: fit.distance + depth_margin,
            ..fit
        }
        .with_min_distance(min_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn scene() -> Scene {
        Scene::new(Mesh::cube(2.0), RotationState::new(0.0, 1.0, 0.0))
    }

    #[test]
    fn test_companion_sits_right_of_primary() {
        let scene = scene();
        assert_eq!(scene.additional.len(), 1);

        let cube = scene.additional[0].world_bounds();
        let primary = scene.primary.world_bounds();
        assert!(cube.min.x > primary.max.x);
        assert!((cube.size().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounds_cover_every_node() {
        let scene = scene();
        let bounds = scene.bounds();
        assert!(bounds.contains_box(&scene.primary.world_bounds()));
        assert!(bounds.contains_box(&scene.additional[0].world_bounds()));
        assert_eq!(scene.nodes().count(), 2);
    }

    #[test]
    fn test_framing_centers_on_union() {
        let scene = scene();
        let fit = scene.framing(45.0, 0.5).unwrap();
        assert!((fit.center - scene.bounds().center()).norm() < 1e-5);
        assert!(fit.distance > scene.bounds().max_extent());
    }

    #[test]
    fn test_framing_rejects_bad_fov() {
        assert!(matches!(scene().framing(180.0, 0.5), Err(FitError::InvalidFov(_))));
    }

    #[test]
    fn test_framing_empty_primary_uses_min_distance() {
        let mut scene = scene();
        scene.additional.clear();
        scene.primary = Actor::new(Mesh::new());
        let fit = scene.framing(60.0, 2.0).unwrap();
        assert_eq!(fit.center, Point3::origin());
        assert_eq!(fit.distance, 2.0);
    }

    #[test]
    fn test_advance_spins_companion_only() {
        let mut scene = scene();
        scene.advance(Duration::from_secs(1));
        assert_eq!(scene.primary.rotation, RotationState::zero());
        assert!((scene.additional[0].rotation.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_replace_primary_moves_companion() {
        let mut scene = scene();
        scene.replace_primary(Mesh::cube(10.0));
        let cube = scene.additional[0].world_bounds();
        assert!(cube.min.x > 5.0);
        assert!((cube.size().x - 5.0).abs() < 1e-4);
    }
}
