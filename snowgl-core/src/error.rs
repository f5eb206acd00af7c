//! Error types for the transform core and OBJ loading

use thiserror::Error;

/// Errors raised by vector, matrix, camera and mesh operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// Normalizing a vector of length zero
    #[error("cannot normalize the zero vector")]
    ZeroVector,

    /// A component is NaN or infinite
    #[error("vector has a non-finite component")]
    NonFiniteVector,

    /// Camera parameters outside their valid range
    #[error("invalid camera parameters: {0}")]
    InvalidCamera(String),

    /// Operand shapes are incompatible for the requested operation
    #[error("dimension mismatch in {op}: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    DimensionMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Entries do not describe a rectangular matrix
    #[error("malformed matrix: {0}")]
    Shape(String),

    /// The matrix has no inverse
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f64 },
}

/// Result type for math operations
pub type MathResult<T> = Result<T, MathError>;

/// Errors raised when building mesh geometry buffers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A buffer of xyz triples has a stray component
    #[error("{buffer} buffer length {len} is not a multiple of 3")]
    NotTriples { buffer: &'static str, len: usize },

    /// Normal count differs from vertex count
    #[error("{normals} normals supplied for {vertices} vertices")]
    NormalCount { vertices: usize, normals: usize },

    /// A face index points past the vertex buffer
    #[error("index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: usize, vertices: usize },
}

/// Errors raised while loading OBJ geometry
#[derive(Debug, Error)]
pub enum ObjError {
    /// Malformed OBJ content
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The parsed data did not form valid buffers
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OBJ loading
pub type ObjResult<T> = Result<T, ObjError>;
