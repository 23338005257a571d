//! Procedural sphere meshes: octahedron subdivision, index types, and colored vertex buffers.

pub mod error;
pub mod icosphere;
pub mod index;
pub mod sphere_mesh;

pub use error::MeshError;
pub use icosphere::{
    OCTAHEDRON_FACES, OCTAHEDRON_VERTICES, generate_sphere, triangle_count, vertex_count,
};
pub use index::MeshIndex;
pub use sphere_mesh::{ColoredVertex, SphereMesh};
