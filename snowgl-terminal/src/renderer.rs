/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use snowgl_core::{vector, Mat, Real};
use std::io::Write;

use crate::scene::Scene;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Drawn when the normal matrix is unavailable and faces cannot be shaded
const UNSHADED: char = '+';

/// Clip-space `w` below this is treated as behind the camera
const MIN_W: Real = 1e-6;

/// ASCII renderer that rasterizes a scene into terminal characters
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

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at column `x`, row `y`, if inside the frame
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.char_buffer[y * self.width + x])
    }

    /// Number of cells covered by geometry
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    pub fn render(&mut self, scene: &Scene) {
        let camera = &scene.camera;
        let mvp = &(camera.projection_matrix() * &camera.view_matrix()) * &scene.mesh.model_matrix();

        let normal_matrix = match scene.mesh.normal_matrix() {
            Ok(matrix) => Some(matrix),
            Err(err) => {
                log::warn!("drawing unshaded: {}", err);
                None
            }
        };
        let light = vector::normalize(vector::scale(camera.orientation(), -1.0))
            .unwrap_or([0.0, 0.0, 1.0]);

        let geometry = scene.mesh.geometry();
        for triangle in geometry.triangles() {
            let mut screen = [(0.0, 0.0, 0.0); 3];
            let mut visible = true;
            for (slot, &i) in screen.iter_mut().zip(triangle.iter()) {
                match self.project(&mvp, geometry.position(i)) {
                    Some(p) => *slot = p,
                    None => visible = false,
                }
            }
            if !visible {
                continue;
            }

            let character = match &normal_matrix {
                Some(matrix) => {
                    let normal = triangle
                        .iter()
                        .fold([0.0; 3], |acc, &i| vector::add(acc, geometry.normal(i)));
                    shade(matrix, normal, light)
                }
                None => UNSHADED,
            };
            self.rasterize_triangle(&screen, character);
        }
    }

    /// Project a model-space point to screen space
    fn project(&self, mvp: &Mat, point: [Real; 3]) -> Option<(f32, f32, f32)> {
        let clip = mvp.transform_point(point);
        if clip[3] < MIN_W {
            return None;
        }

        let ndc_x = clip[0] / clip[3];
        let ndc_y = clip[1] / clip[3];
        let depth = clip[2] / clip[3];
        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as Real;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as Real;
        Some((screen_x as f32, screen_y as f32, depth as f32))
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a ramp character from the world-space normal's facing towards `light`
fn shade(normal_matrix: &Mat, normal: [Real; 3], light: [Real; 3]) -> char {
    let world = normal_matrix.transform_direction(normal);
    // Faces seen from behind are lit by their back side
    let brightness = match vector::normalize(world) {
        Ok(n) => vector::dot(n, light).abs(),
        Err(_) => 0.0,
    };

    let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as Real) as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
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
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
