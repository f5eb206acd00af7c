/// snowgl core library - vector and matrix math, camera and mesh transforms
///
/// This library holds no graphics-context state. Renderers read matrices
/// from a `Camera` and a `Mesh` (already in GPU column-major layout) and
/// upload them themselves.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod mesh;
pub mod obj;
pub mod vector;

/// Scalar type used by all core math; GPU buffers are `f32`
pub type Real = f64;

// Re-export commonly used types
pub use camera::Camera;
pub use error::{GeometryError, MathError, MathResult, ObjError, ObjResult};
pub use geometry::Geometry;
pub use matrix::Mat;
pub use mesh::Mesh;
pub use obj::{load_obj, parse_obj};
