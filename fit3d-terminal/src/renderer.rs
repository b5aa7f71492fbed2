//! ASCII rasterizer for terminal rendering

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use fit3d_core::{Camera, SceneNode, Triangle};
use nalgebra::Matrix4;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Converts scene nodes into a grid of shaded characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate buffers for a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn render_node(&mut self, node: &SceneNode, camera: &Camera) {
        for triangle in &node.mesh.triangles {
            self.render_triangle(triangle, &node.transform, camera);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // clipped
            }
        }

        // Shade by the world-space normal against a light at the camera
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let light_dir = (camera.position - camera.target).normalize();
        let brightness = normal.normalize().dot(&light_dir).max(0.0);
        if !brightness.is_finite() {
            return;
        }

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Screen-space bounds, clipped to the buffer
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    /// Queue the buffer starting at terminal row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for (y, row) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            writer.queue(cursor::MoveTo(0, top + y as u16))?;
            for &c in row {
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    _ => Color::Cyan,
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Barycentric weights of `p` in a screen-space triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);
    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    Some((w0, w1, 1.0 - w0 - w1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fit3d_core::{fit_camera, Mesh, SceneObject, ViewAxis};

    #[test]
    fn test_barycentric_vertices() {
        let (a, b, c) = ((0.0, 0.0), (4.0, 0.0), (0.0, 4.0));
        let (w0, w1, w2) = barycentric(a, b, c, a).unwrap();
        assert!((w0 - 1.0).abs() < 1e-6 && w1.abs() < 1e-6 && w2.abs() < 1e-6);
        assert!(barycentric(a, a, a, a).is_none());
    }

    #[test]
    fn test_fitted_cube_lands_in_the_middle() {
        let node = SceneNode::new(Mesh::cube(2.0));
        let mut camera = Camera::new(40, 40);
        let fit = fit_camera(&node.world_bounds(), camera.fov_degrees()).unwrap();
        // Extra margin for the cube's near face
        let fit = fit.with_min_distance(fit.distance + 2.0);
        camera.apply_fit(&fit, ViewAxis::PosZ);

        let mut renderer = AsciiRenderer::new(40, 40);
        renderer.render_node(&node, &camera);
        assert_ne!(renderer.cell(20, 20), Some(' '));
        assert_eq!(renderer.cell(0, 0), Some(' '));
        assert_eq!(renderer.cell(40, 0), None);

        renderer.clear();
        assert_eq!(renderer.cell(20, 20), Some(' '));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.resize(20, 8);
        assert_eq!((renderer.width(), renderer.height()), (20, 8));
        assert_eq!(renderer.cell(19, 7), Some(' '));
    }

    #[test]
    fn test_draw_emits_every_cell() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out, 1).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches(' ').count(), 6);
    }
}
