/// Indexed triangle geometry, stored in GPU-ready buffers
use crate::error::GeometryError;
use crate::vector;
use crate::Real;

/// Vertex positions, vertex normals and triangle indices.
///
/// Positions and normals are flat xyz triples; `indices` lists three
/// vertex indices per triangle. The buffers are fixed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u16>,
}

impl Geometry {
    pub fn new(vertices: Vec<f32>, normals: Vec<f32>, indices: Vec<u16>) -> Result<Self, GeometryError> {
        check_triples("vertex", vertices.len())?;
        check_triples("normal", normals.len())?;
        check_triples("index", indices.len())?;
        if normals.len() != vertices.len() {
            return Err(GeometryError::NormalCount {
                vertices: vertices.len() / 3,
                normals: normals.len() / 3,
            });
        }
        check_indices(&indices, vertices.len() / 3)?;

        Ok(Self {
            vertices,
            normals,
            indices,
        })
    }

    /// Build geometry whose normals are accumulated from the faces
    pub fn with_generated_normals(vertices: Vec<f32>, indices: Vec<u16>) -> Result<Self, GeometryError> {
        check_triples("vertex", vertices.len())?;
        check_triples("index", indices.len())?;
        check_indices(&indices, vertices.len() / 3)?;

        let normals = generate_normals(&vertices, &indices);
        Ok(Self {
            vertices,
            normals,
            indices,
        })
    }

    /// A single triangle in the z = 0 plane facing +z
    pub fn triangle() -> Self {
        let vertices = vec![-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0, 2, 1];
        let normals = generate_normals(&vertices, &indices);
        Self {
            vertices,
            normals,
            indices,
        }
    }

    /// An axis-aligned cube centred on the origin, four vertices per face
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        // (normal, u, v) with u x v = normal
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(6 * 4 * 3);
        let mut normals = Vec::with_capacity(6 * 4 * 3);
        let mut indices = Vec::with_capacity(6 * 6);

        for (face, (n, u, v)) in FACES.iter().enumerate() {
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                for k in 0..3 {
                    vertices.push(half * (n[k] + su * u[k] + sv * v[k]));
                }
                normals.extend_from_slice(n);
            }
            let base = (face * 4) as u16;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            vertices,
            normals,
            indices,
        }
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> [Real; 3] {
        read_triple(&self.vertices, i)
    }

    /// Normal of vertex `i`
    pub fn normal(&self, i: usize) -> [Real; 3] {
        read_triple(&self.normals, i)
    }

    /// Vertex indices of each triangle
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

fn check_triples(buffer: &'static str, len: usize) -> Result<(), GeometryError> {
    if len % 3 != 0 {
        return Err(GeometryError::NotTriples { buffer, len });
    }
    Ok(())
}

fn check_indices(indices: &[u16], vertices: usize) -> Result<(), GeometryError> {
    match indices.iter().find(|&&i| i as usize >= vertices) {
        Some(&index) => Err(GeometryError::IndexOutOfRange {
            index: index as usize,
            vertices,
        }),
        None => Ok(()),
    }
}

fn read_triple(buffer: &[f32], i: usize) -> [Real; 3] {
    [
        buffer[3 * i] as Real,
        buffer[3 * i + 1] as Real,
        buffer[3 * i + 2] as Real,
    ]
}

/// Area-weighted vertex normals.
///
/// Each triangle `[i0, i1, i2]` contributes `(v2 - v0) x (v1 - v0)`, whose
/// length is twice its area, to all three of its vertices. The sums are
/// then normalized; vertices touched by no face keep a zero normal.
pub fn generate_normals(vertices: &[f32], indices: &[u16]) -> Vec<f32> {
    let mut sums = vec![[0.0 as Real; 3]; vertices.len() / 3];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let v0 = read_triple(vertices, i0);
        let v1 = read_triple(vertices, i1);
        let v2 = read_triple(vertices, i2);

        let area = vector::cross(vector::sub(v2, v0), vector::sub(v1, v0));
        for i in [i0, i1, i2] {
            sums[i] = vector::add(sums[i], area);
        }
    }

    sums.into_iter()
        .flat_map(|n| vector::normalize(n).unwrap_or(n))
        .map(|x| x as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_faces_plus_z() {
        let tri = Geometry::triangle();
        assert_eq!(tri.vertex_count(), 3);
        assert_eq!(tri.triangle_count(), 1);
        for i in 0..3 {
            assert_eq!(tri.normal(i), [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_cube_buffers() {
        let cube = Geometry::cube(2.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.vertices().iter().all(|c| c.abs() == 1.0));
        assert!(cube.triangles().all(|t| t.iter().all(|&i| i < 24)));
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Geometry::cube(2.0);
        for i in 0..cube.vertex_count() {
            let p = cube.position(i);
            let n = cube.normal(i);
            assert!(vector::dot(p, n) > 0.0);
        }
    }

    #[test]
    fn test_new_validates_buffers() {
        let err = Geometry::new(vec![0.0; 4], vec![0.0; 4], vec![]).unwrap_err();
        assert_eq!(err, GeometryError::NotTriples { buffer: "vertex", len: 4 });

        let err = Geometry::new(vec![0.0; 9], vec![0.0; 6], vec![0, 1, 2]).unwrap_err();
        assert_eq!(err, GeometryError::NormalCount { vertices: 3, normals: 2 });

        let err = Geometry::new(vec![0.0; 9], vec![0.0; 9], vec![0, 1, 3]).unwrap_err();
        assert_eq!(err, GeometryError::IndexOutOfRange { index: 3, vertices: 3 });
    }

    #[test]
    fn test_generated_normals_are_shared_and_unit() {
        // Two triangles folded along the x axis
        let vertices = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, //
        ];
        let geometry = Geometry::with_generated_normals(vertices, vec![0, 2, 1, 0, 1, 3]).unwrap();

        let shared = geometry.normal(0);
        assert!((vector::norm(shared) - 1.0).abs() < 1e-6);
        // Equal-area faces with normals +z and +y average to the diagonal
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((shared[1] - h).abs() < 1e-6);
        assert!((shared[2] - h).abs() < 1e-6);
        assert_eq!(geometry.normal(2), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unused_vertex_keeps_zero_normal() {
        let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0];
        let normals = generate_normals(&vertices, &[0, 2, 1]);
        assert_eq!(&normals[9..], &[0.0, 0.0, 0.0]);
    }
}
