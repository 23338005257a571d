//! Unit sphere generation by repeated subdivision of an octahedron.
//!
//! Each pass splits every triangle into four: three corner triangles and one
//! center triangle built from the edge midpoints. Midpoints are pushed out to
//! the unit sphere and deduplicated by exact coordinate equality, so an edge
//! shared by two triangles contributes a single vertex.

use spinsphere_math::Vec3;
use tracing::debug;

use crate::{MeshError, MeshIndex};

/// Octahedron vertices, one on each axis.
pub const OCTAHEDRON_VERTICES: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
];

/// Octahedron faces, counter-clockwise when viewed from outside.
pub const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 1],
    [1, 5, 2],
    [2, 5, 3],
    [3, 5, 4],
    [4, 5, 1],
];

/// Number of vertices produced at the given subdivision level: `4·4^q + 2`.
///
/// Saturates at `usize::MAX` for levels too large to represent.
pub fn vertex_count(quality: usize) -> usize {
    subdivision_factor(quality)
        .saturating_mul(4)
        .saturating_add(2)
}

/// Number of triangles produced at the given subdivision level: `8·4^q`.
pub fn triangle_count(quality: usize) -> usize {
    subdivision_factor(quality).saturating_mul(8)
}

fn subdivision_factor(quality: usize) -> usize {
    u32::try_from(quality).map_or(usize::MAX, |q| 4usize.saturating_pow(q))
}

/// Generates a unit sphere by subdividing an octahedron `quality` times.
///
/// Vertices are appended to `vertices` and triangle index triples to
/// `indices`. Both are normally empty on entry; if they are not, the new mesh
/// is appended after the existing data, its indices offset accordingly, and
/// deduplication only considers vertices produced by this call.
///
/// Fails with [`MeshError::IndexOverflow`] before doing any work when the
/// finished mesh would hold more vertices than `I` can address. On error the
/// buffers are left as they were.
///
/// Deduplication is a linear scan, so a pass costs time quadratic in the
/// vertex count.
pub fn generate_sphere<I: MeshIndex>(
    quality: usize,
    vertices: &mut Vec<Vec3>,
    indices: &mut Vec<I>,
) -> Result<(), MeshError> {
    let base = vertices.len();
    let needed = base.saturating_add(vertex_count(quality));
    if needed > I::MAX_VERTICES {
        return Err(MeshError::IndexOverflow {
            vertex_count: needed,
            max: I::MAX_VERTICES,
        });
    }

    match subdivide_octahedron(quality, base, vertices) {
        Ok(triangles) => {
            indices.extend_from_slice(&triangles);
            debug!(
                quality,
                vertices = vertices.len() - base,
                triangles = triangles.len() / 3,
                "generated sphere"
            );
            Ok(())
        }
        Err(err) => {
            vertices.truncate(base);
            Err(err)
        }
    }
}

fn subdivide_octahedron<I: MeshIndex>(
    quality: usize,
    base: usize,
    vertices: &mut Vec<Vec3>,
) -> Result<Vec<I>, MeshError> {
    vertices.extend_from_slice(&OCTAHEDRON_VERTICES);

    let mut triangles = OCTAHEDRON_FACES
        .iter()
        .flatten()
        .map(|&i| to_index::<I>(base + i))
        .collect::<Result<Vec<I>, _>>()?;

    for pass in 0..quality {
        let mut next = Vec::with_capacity(triangles.len() * 4);

        // Consumed from the back, like popping a stack; this fixes the
        // numbering of new vertices.
        for tri in triangles.chunks_exact(3).rev() {
            let [p0, p1, p2] = [tri[0], tri[1], tri[2]];
            let a = vertices[p0.to_usize()];
            let b = vertices[p1.to_usize()];
            let c = vertices[p2.to_usize()];

            let m0 = find_or_insert(vertices, base, ((a + b) / 2.0).normalize())?;
            let m1 = find_or_insert(vertices, base, ((a + c) / 2.0).normalize())?;
            let m2 = find_or_insert(vertices, base, ((b + c) / 2.0).normalize())?;

            next.extend_from_slice(&[
                p0, m0, m1, //
                m0, m2, m1, //
                m0, p1, m2, //
                m1, m2, p2,
            ]);
        }

        triangles = next;
        debug!(
            pass,
            vertices = vertices.len() - base,
            triangles = triangles.len() / 3,
            "subdivision pass"
        );
    }

    Ok(triangles)
}

/// Index of `v` among the vertices generated so far, appending it if absent.
fn find_or_insert<I: MeshIndex>(
    vertices: &mut Vec<Vec3>,
    base: usize,
    v: Vec3,
) -> Result<I, MeshError> {
    let position = match vertices[base..].iter().position(|existing| *existing == v) {
        Some(offset) => base + offset,
        None => {
            vertices.push(v);
            vertices.len() - 1
        }
    };
    to_index(position)
}

fn to_index<I: MeshIndex>(position: usize) -> Result<I, MeshError> {
    I::from_usize(position).ok_or(MeshError::IndexOverflow {
        vertex_count: position + 1,
        max: I::MAX_VERTICES,
    })
}
