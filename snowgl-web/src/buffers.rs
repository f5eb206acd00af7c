/// Static vertex, normal and index buffers for one geometry
use snowgl_core::Geometry;
use web_sys::{WebGlBuffer, WebGlRenderingContext as Gl};

use crate::error::WebError;

pub struct GpuGeometry {
    vertices: WebGlBuffer,
    normals: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: i32,
}

impl GpuGeometry {
    pub fn upload(gl: &Gl, geometry: &Geometry) -> Result<Self, WebError> {
        let specs: [(u32, &[u8], &'static str); 3] = [
            (Gl::ARRAY_BUFFER, bytemuck::cast_slice(geometry.vertices()), "vertex"),
            (Gl::ARRAY_BUFFER, bytemuck::cast_slice(geometry.normals()), "normal"),
            (Gl::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(geometry.indices()), "index"),
        ];
        let created = create_all(
            specs,
            |(target, bytes, name)| array_buffer(gl, target, bytes, name),
            |buffer| gl.delete_buffer(Some(buffer)),
        )?;
        let [vertices, normals, indices] =
            <[WebGlBuffer; 3]>::try_from(created).map_err(|_| WebError::Buffer("geometry"))?;

        log::debug!(
            "uploaded {} vertices, {} indices",
            geometry.vertex_count(),
            geometry.indices().len()
        );

        Ok(Self {
            vertices,
            normals,
            indices,
            index_count: geometry.indices().len() as i32,
        })
    }

    /// Point `location` at the position buffer; negative locations are inactive
    pub fn bind_positions(&self, gl: &Gl, location: i32) {
        bind_attribute(gl, &self.vertices, location);
    }

    pub fn bind_normals(&self, gl: &Gl, location: i32) {
        bind_attribute(gl, &self.normals, location);
    }

    pub fn draw(&self, gl: &Gl) {
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&self.indices));
        gl.draw_elements_with_i32(Gl::TRIANGLES, self.index_count, Gl::UNSIGNED_SHORT, 0);
    }

    pub fn release(&self, gl: &Gl) {
        gl.delete_buffer(Some(&self.vertices));
        gl.delete_buffer(Some(&self.normals));
        gl.delete_buffer(Some(&self.indices));
    }
}

/// Create one object per spec; if any fails, release the ones made so far
pub(crate) fn create_all<S, T, E>(
    specs: impl IntoIterator<Item = S>,
    mut create: impl FnMut(S) -> Result<T, E>,
    mut release: impl FnMut(&T),
) -> Result<Vec<T>, E> {
    let mut created = Vec::new();
    for spec in specs {
        match create(spec) {
            Ok(item) => created.push(item),
            Err(err) => {
                created.iter().rev().for_each(&mut release);
                return Err(err);
            }
        }
    }
    Ok(created)
}

fn array_buffer(gl: &Gl, target: u32, bytes: &[u8], name: &'static str) -> Result<WebGlBuffer, WebError> {
    let buffer = gl.create_buffer().ok_or(WebError::Buffer(name))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, Gl::STATIC_DRAW);
    Ok(buffer)
}

fn bind_attribute(gl: &Gl, buffer: &WebGlBuffer, location: i32) {
    if location < 0 {
        return;
    }
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
    gl.vertex_attrib_pointer_with_i32(location as u32, 3, Gl::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(location as u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_all_keeps_every_object() {
        let mut released = Vec::new();
        let created = create_all([1, 2, 3], |n| Ok::<_, ()>(n * 10), |n| released.push(*n));
        assert_eq!(created, Ok(vec![10, 20, 30]));
        assert!(released.is_empty());
    }

    #[test]
    fn test_create_all_releases_on_failure() {
        let mut released = Vec::new();
        let result = create_all(
            ["vertex", "normals", "index"],
            |name| if name == "index" { Err(name) } else { Ok(name.len()) },
            |len| released.push(*len),
        );
        assert_eq!(result, Err("index"));
        // Newest first
        assert_eq!(released, vec![7, 6]);
    }

    #[test]
    fn test_create_all_first_failure_releases_nothing() {
        let mut released: Vec<i32> = Vec::new();
        let result = create_all([0, 1], |_| Err::<i32, _>("no context"), |n| released.push(*n));
        assert_eq!(result, Err("no context"));
        assert!(released.is_empty());
    }
}
