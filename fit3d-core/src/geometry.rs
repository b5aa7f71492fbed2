//! Meshes and the scene nodes that place them in the world

use nalgebra::{Matrix4, Point3, Vector3};

use crate::bounds::BoundingBox;
use crate::fit::SceneObject;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        (v1 - v0).cross(&(v2 - v0)).normalize()
    }
}

/// A triangle mesh in local space
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Local-space bounds of every vertex, `None` for an empty mesh
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.triangles
                .iter()
                .flat_map(|t| t.vertices.iter().map(|v| v.position)),
        )
    }

    /// Axis-aligned cube centered on the origin, two triangles per face
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Each face: outward normal plus the two in-plane axes spanning it
        let faces = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];

        for (normal, u, v) in faces {
            let corner = |su: f32, sv: f32| {
                let p = (normal + u * su + v * sv) * half;
                Vertex::new(Point3::from(p), normal)
            };
            let (a, b, c, d) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }

        mesh
    }
}

/// A mesh placed in the world by a model matrix
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
}

impl SceneNode {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            transform: Matrix4::identity(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }
}

impl SceneObject for SceneNode {
    fn world_bounds(&self) -> BoundingBox {
        match self.mesh.bounds() {
            Some(local) => local.transformed(&self.transform),
            None => BoundingBox::point(self.transform.transform_point(&Point3::origin())),
        }
    }
}
