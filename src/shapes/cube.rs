use glam::Vec3;

use crate::mesh::{Mesh, Primitive, Vertex};

const HALF_EXTENT: f32 = 0.25;

/// (outward normal, u axis, v axis) for each face, with `u x v == normal`
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Y, Vec3::Z, Vec3::X),
];

const FACE_COLOURS: [[f32; 4]; 6] = [
    [0.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
];

/// Corner signs along (u, v) for the two triangles of a face
const CORNERS: [(f32, f32); 6] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
];

/// 12 independent triangles with flat normals and one colour per face
pub fn cube() -> Mesh {
    let vertices = FACES
        .iter()
        .zip(FACE_COLOURS)
        .flat_map(|(&(normal, u, v), colour)| {
            CORNERS.iter().map(move |&(su, sv)| {
                let position = (normal + su * u + sv * v) * HALF_EXTENT;
                Vertex::new(position.into(), normal.into())
                    .with_colour(colour)
                    .with_texture([(su + 1.0) / 2.0, (sv + 1.0) / 2.0])
            })
        })
        .collect::<Vec<Vertex>>();

    let count = vertices.len() as u32;
    let mut mesh = Mesh::new(vertices);
    mesh.push_batch(Primitive::Triangles, 0..count);
    mesh
}
