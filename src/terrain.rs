use glam::Vec3;

use crate::{
    error::MeshError,
    geometry::accumulate_normals,
    heightfield::Heightfield,
    mesh::{Mesh, Primitive, Vertex},
};

/// Lay a heightfield out on the xz plane, centred on the origin.
///
/// Heights are shifted so that 0.5 sits at y = 0 and scaled by `width`. Each pair of
/// neighbouring x rows becomes one triangle strip; normals are averaged from the faces.
pub fn terrain(field: &Heightfield, width: f32, depth: f32) -> Result<Mesh, MeshError> {
    let (xsize, zsize) = (field.xsize, field.zsize);
    crate::shapes::require("terrain", "rows", 2, xsize)?;
    crate::shapes::require("terrain", "columns", 2, zsize)?;
    let expected = crate::shapes::vertex_total("terrain", xsize.checked_mul(zsize))? as usize;
    if field.heights.len() != expected {
        return Err(MeshError::IndexOutOfRange {
            index: expected as u32 - 1,
            len: field.heights.len(),
        });
    }

    let x_step = width / xsize as f32;
    let z_step = depth / zsize as f32;

    let mut vertices = Vec::with_capacity(expected);
    for x in 0..xsize {
        for z in 0..zsize {
            let h = field.get(x, z);
            let position = [
                -width / 2.0 + x as f32 * x_step,
                (h - 0.5) * width,
                -depth / 2.0 + z as f32 * z_step,
            ];
            vertices.push(
                Vertex::new(position, [0.0, 1.0, 0.0])
                    .with_colour([h, h, h, 1.0])
                    .with_texture([
                        x as f32 / (xsize - 1) as f32,
                        z as f32 / (zsize - 1) as f32,
                    ]),
            );
        }
    }

    let mut mesh = Mesh::new(vertices);
    // the far row comes first in each pair so the strip faces up
    for x in 0..xsize - 1 {
        mesh.push_batch(
            Primitive::TriangleStrip,
            (0..zsize).flat_map(|z| [(x + 1) * zsize + z, x * zsize + z]),
        );
    }

    let positions: Vec<Vec3> = mesh
        .vertices
        .iter()
        .map(|v| Vec3::from(v.position))
        .collect();
    let normals = accumulate_normals(&positions, &mesh.triangles());
    for (vertex, normal) in mesh.vertices.iter_mut().zip(normals) {
        vertex.normal = normal.into();
    }

    Ok(mesh)
}
