//! Sphere mesh container and GPU-ready colored vertices.

use spinsphere_math::Vec3;

use crate::{MeshError, MeshIndex, generate_sphere};

/// A vertex carrying a position and an RGB color, laid out for direct upload.
///
/// Layout (24 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` color `[f32; 3]`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(ColoredVertex, [u8; 24]);

impl ColoredVertex {
    /// Vertex at `unit_position * radius`, colored by mapping each unit
    /// coordinate from `[-1, 1]` onto `[0, 1]`.
    pub fn from_unit_position(unit_position: Vec3, radius: f32) -> Self {
        let color = unit_position * 0.5 + Vec3::new(0.5, 0.5, 0.5);
        Self {
            position: (unit_position * radius).to_array(),
            color: color.to_array(),
        }
    }
}

/// An immutable unit-sphere mesh: unique vertex positions plus triangle
/// index triples with outward winding.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereMesh<I: MeshIndex = u16> {
    vertices: Vec<Vec3>,
    indices: Vec<I>,
    quality: usize,
}

impl<I: MeshIndex> SphereMesh<I> {
    /// Builds the mesh at the given subdivision level.
    pub fn generate(quality: usize) -> Result<Self, MeshError> {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        generate_sphere(quality, &mut vertices, &mut indices)?;
        Ok(Self {
            vertices,
            indices,
            quality,
        })
    }

    pub fn quality(&self) -> usize {
        self.quality
    }

    /// Unit-length vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Flat index buffer, three entries per triangle.
    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [I; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Vertex positions moved out to `radius`.
    pub fn scaled_positions(&self, radius: f32) -> Vec<Vec3> {
        self.vertices.iter().map(|&v| v * radius).collect()
    }

    /// Colored vertices at `radius`, in the same order as [`Self::vertices`].
    pub fn colored_vertices(&self, radius: f32) -> Vec<ColoredVertex> {
        self.vertices
            .iter()
            .map(|&v| ColoredVertex::from_unit_position(v, radius))
            .collect()
    }

    /// Consumes the mesh, returning its vertex and index buffers.
    pub fn into_buffers(self) -> (Vec<Vec3>, Vec<I>) {
        (self.vertices, self.indices)
    }
}
