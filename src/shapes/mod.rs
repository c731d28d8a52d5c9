//! Procedurally generated meshes: a cube, a latitude/longitude sphere and extruded prisms
//! (cylinders and cogs).
//!
//! Every builder returns a [`Mesh`](crate::mesh::Mesh) whose batches reproduce the draw
//! calls the shape needs: fans over the poles and lids, strips around the sides.

mod cube;
mod prism;
mod sphere;

pub use cube::cube;
pub use prism::{cog, cylinder};
pub use sphere::{paint_bands, sphere};

use crate::error::MeshError;

pub(crate) fn require(
    shape: &'static str,
    what: &'static str,
    min: u32,
    got: u32,
) -> Result<(), MeshError> {
    if got < min {
        return Err(MeshError::TooFewSegments {
            shape,
            what,
            min,
            got,
        });
    }
    Ok(())
}

/// A vertex count that overflowed on the way is too large for `u32` indices
pub(crate) fn vertex_total(shape: &'static str, count: Option<u32>) -> Result<u32, MeshError> {
    count.ok_or(MeshError::TooManyVertices { shape })
}

#[cfg(test)]
pub(crate) mod test_util {
    use glam::Vec3;

    use crate::{geometry::face_normal, mesh::Mesh};

    pub fn position(mesh: &Mesh, idx: u32) -> Vec3 {
        Vec3::from(mesh.vertices[idx as usize].position)
    }

    pub fn normal(mesh: &Mesh, idx: u32) -> Vec3 {
        Vec3::from(mesh.vertices[idx as usize].normal)
    }

    /// Checks that every non-degenerate triangle faces the same way as its vertex normals
    pub fn assert_outward(mesh: &Mesh) {
        for [a, b, c] in mesh.triangles() {
            let face = face_normal(position(mesh, a), position(mesh, b), position(mesh, c));
            if face.length_squared() < 1e-12 {
                continue;
            }
            let shading = normal(mesh, a) + normal(mesh, b) + normal(mesh, c);
            assert!(
                face.dot(shading) > 0.0,
                "triangle {a} {b} {c} faces {face} against its normals {shading}"
            );
        }
    }
}
