use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::{
    conversion::RingCoords,
    error::MeshError,
    mesh::{Mesh, Primitive, Vertex},
};

/// Closed cylinder centred on the origin with its axis along y
pub fn cylinder(segments: u32, height: f32, radius: f32) -> Result<Mesh, MeshError> {
    check_segments("cylinder", segments)?;
    Ok(prism(
        segments,
        height,
        |_| radius,
        |p| [0.3 + p.x, 0.3 + p.y, 0.5 + p.z, 1.0],
    ))
}

/// A cylinder whose rim alternates between `tooth` (even ring positions) and `radius` (odd
/// ring positions), giving a gear-like outline.
pub fn cog(segments: u32, height: f32, radius: f32, tooth: f32) -> Result<Mesh, MeshError> {
    check_segments("cog", segments)?;
    Ok(prism(
        segments,
        height,
        |k| if k % 2 == 0 { tooth } else { radius },
        |p| [0.3 + p.x, 0.5 + p.y, 0.3 + p.z, 1.0],
    ))
}

fn check_segments(shape: &'static str, segments: u32) -> Result<(), MeshError> {
    super::require(shape, "segments", 3, segments)?;
    super::vertex_total(shape, segments.checked_mul(4).and_then(|n| n.checked_add(2)))?;
    Ok(())
}

/// Extrude a closed ring of `segments` points along y.
///
/// Layout: top centre, top ring, (top, bottom) pairs for the side, bottom ring, bottom centre.
/// Lid and side vertices are duplicated so that each can carry its own normal.
fn prism(
    segments: u32,
    height: f32,
    radius_at: impl Fn(u32) -> f32,
    colour_of: impl Fn(Vec3) -> [f32; 4],
) -> Mesh {
    let n = segments;
    let top = height * 0.5;
    let bottom = -top;

    // angles run clockwise seen from above so that the top fan faces +y
    let ring = |k: u32, y: f32| {
        Vec3::from(&RingCoords {
            radius: radius_at(k),
            angle: PI - k as f32 * TAU / n as f32,
            y,
        })
    };
    let lid_uv = |p: Vec3, k: u32| {
        let r = radius_at(k).max(f32::EPSILON);
        [0.5 + 0.5 * p.x / r, 0.5 + 0.5 * p.z / r]
    };
    let vertex = |p: Vec3, normal: Vec3, uv: [f32; 2]| {
        Vertex::new(p.into(), normal.into())
            .with_colour(colour_of(p))
            .with_texture(uv)
    };

    let mut vertices = Vec::with_capacity((4 * n + 2) as usize);
    vertices.push(vertex(Vec3::new(0.0, top, 0.0), Vec3::Y, [0.5, 0.5]));
    for k in 0..n {
        let p = ring(k, top);
        vertices.push(vertex(p, Vec3::Y, lid_uv(p, k)));
    }
    for k in 0..n {
        let (upper, lower) = (ring(k, top), ring(k, bottom));
        let radial = Vec3::new(upper.x, 0.0, upper.z)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let u = k as f32 / n as f32;
        vertices.push(vertex(upper, radial, [u, 0.0]));
        vertices.push(vertex(lower, radial, [u, 1.0]));
    }
    for k in 0..n {
        let p = ring(k, bottom);
        vertices.push(vertex(p, Vec3::NEG_Y, lid_uv(p, k)));
    }
    vertices.push(vertex(Vec3::new(0.0, bottom, 0.0), Vec3::NEG_Y, [0.5, 0.5]));

    let top_ring = 1;
    let side = top_ring + n;
    let bottom_ring = side + 2 * n;
    let bottom_centre = bottom_ring + n;

    let mut mesh = Mesh::new(vertices);
    mesh.push_batch(
        Primitive::TriangleFan,
        std::iter::once(0)
            .chain(top_ring..top_ring + n)
            .chain(std::iter::once(top_ring)),
    );
    mesh.push_batch(
        Primitive::TriangleStrip,
        (side..side + 2 * n).chain([side, side + 1]),
    );
    mesh.push_batch(
        Primitive::TriangleFan,
        std::iter::once(bottom_centre)
            .chain((bottom_ring..bottom_ring + n).rev())
            .chain(std::iter::once(bottom_ring + n - 1)),
    );
    mesh
}
