use thiserror::Error;

/// Errors raised while building a geometry snapshot.
///
/// Any of these makes the owning cache permanently unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Mesh has no position data")]
    MissingPositions,
    #[error("Position array length {0} is not a multiple of 3")]
    MalformedPositions(usize),
    #[error("Triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Errors raised while resolving a texture coordinate from a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UvError {
    #[error("Mesh has no UVs and planar fallback is disabled")]
    MissingUvs,
}
