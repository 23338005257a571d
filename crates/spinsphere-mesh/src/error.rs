//! Mesh generation error types.

/// Errors that can occur while generating a mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The mesh needs more vertices than the index type can address.
    #[error("mesh needs {vertex_count} vertices but the index type addresses at most {max}")]
    IndexOverflow {
        /// Vertices the mesh would contain, including any already in the output buffer.
        vertex_count: usize,
        /// Number of distinct vertices the index type can name.
        max: usize,
    },
}
