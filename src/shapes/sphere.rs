use glam::Vec3;
use rand::Rng;

use crate::{
    conversion::PolarCoords,
    error::MeshError,
    mesh::{Mesh, Primitive, Vertex},
};

/// Unit sphere (z up) built from a triangle fan at each pole and a triangle strip between
/// each pair of neighbouring latitude rings.
///
/// Vertex 0 is the north pole, followed by `lats - 1` rings of `longs` vertices from north to
/// south, each starting at longitude -180 degrees; the last vertex is the south pole.
pub fn sphere(lats: u32, longs: u32) -> Result<Mesh, MeshError> {
    super::require("sphere", "latitudes", 2, lats)?;
    super::require("sphere", "longitudes", 3, longs)?;
    let total = super::vertex_total(
        "sphere",
        (lats - 1).checked_mul(longs).and_then(|n| n.checked_add(2)),
    )?;

    let lat_step = 180.0 / lats as f32;
    let long_step = 360.0 / longs as f32;

    let mut vertices = Vec::with_capacity(total as usize);
    vertices.push(Vertex::new([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]).with_texture([0.5, 0.0]));
    for ring in 1..lats {
        let lat = 90.0 - ring as f32 * lat_step;
        for step in 0..longs {
            let long = -180.0 + step as f32 * long_step;
            let position = Vec3::from(&PolarCoords::from_degrees(1.0, long, lat));
            vertices.push(
                Vertex::new(position.into(), position.into())
                    .with_texture([step as f32 / longs as f32, ring as f32 / lats as f32]),
            );
        }
    }
    vertices.push(Vertex::new([0.0, 0.0, -1.0], [0.0, 0.0, -1.0]).with_texture([0.5, 1.0]));

    let vertex_count = vertices.len() as u32;
    let south = vertex_count - 1;
    let mut mesh = Mesh::new(vertices);

    // north pole, the first ring, and back to the first ring vertex to close the fan
    mesh.push_batch(
        Primitive::TriangleFan,
        (0..=longs).chain(std::iter::once(1)),
    );

    let mut start = 1;
    for _ in 0..lats - 2 {
        mesh.push_batch(
            Primitive::TriangleStrip,
            (0..longs)
                .flat_map(|i| [start + i, start + i + longs])
                .chain([start, start + longs]),
        );
        start += longs;
    }

    // the last ring runs eastwards, so walk it backwards to keep the fan facing south
    let last_ring = south - longs;
    mesh.push_batch(
        Primitive::TriangleFan,
        std::iter::once(south)
            .chain((last_ring..south).rev())
            .chain(std::iter::once(south - 1)),
    );

    Ok(mesh)
}

/// Colour the sphere in latitude bands: one randomly chosen channel is re-rolled every `longs`
/// vertices while the other two stay at 0.5.
pub fn paint_bands(mesh: &mut Mesh, longs: u32, rng: &mut impl Rng) {
    let channel = rng.gen_range(0..3);
    let mut colour = [0.5, 0.5, 0.5, 1.0];
    colour[channel] = rng.gen::<f32>() * 0.6;

    let band = longs.max(1) as usize;
    for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
        if (i + 1) % band == 0 {
            colour[channel] = rng.gen::<f32>() * 0.6;
        }
        vertex.colour = colour;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::shapes::test_util::{assert_outward, position};

    #[test]
    fn vertex_and_index_counts() {
        let (lats, longs) = (40, 40);
        let mesh = sphere(lats, longs).unwrap();
        assert_eq!(mesh.vertices.len() as u32, 2 + (lats - 1) * longs);
        assert_eq!(mesh.batches.len() as u32, lats);
        assert_eq!(
            mesh.indices.len() as u32,
            (longs + 2) * 2 + (lats - 2) * (longs * 2 + 2)
        );
        mesh.validate().unwrap();
    }

    #[test]
    fn vertices_lie_on_the_unit_sphere() {
        let mesh = sphere(12, 16).unwrap();
        for vertex in &mesh.vertices {
            let p = Vec3::from(vertex.position);
            assert_relative_eq!(p.length(), 1.0, epsilon = 1e-5);
            assert_eq!(vertex.position, vertex.normal);
        }
        assert_relative_eq!(position(&mesh, 0).z, 1.0);
        let south = mesh.vertices.len() as u32 - 1;
        assert_relative_eq!(position(&mesh, south).z, -1.0);
    }

    #[test]
    fn first_ring_starts_at_the_date_line() {
        let mesh = sphere(4, 4).unwrap();
        // ring at 45 degrees north, longitude -180
        let p = position(&mesh, 1);
        let c = 45f32.to_radians().cos();
        assert_relative_eq!(p.x, -c, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, c, epsilon = 1e-5);
    }

    #[test]
    fn surface_faces_outward() {
        assert_outward(&sphere(8, 10).unwrap());
        assert_outward(&sphere(2, 3).unwrap());
    }

    #[test]
    fn two_latitudes_need_no_strips() {
        let mesh = sphere(2, 5).unwrap();
        assert_eq!(mesh.batches.len(), 2);
        assert!(mesh
            .batches
            .iter()
            .all(|b| b.primitive == Primitive::TriangleFan));
    }

    #[test]
    fn rejects_degenerate_resolution() {
        assert!(matches!(
            sphere(1, 10),
            Err(MeshError::TooFewSegments { what: "latitudes", .. })
        ));
        assert!(matches!(
            sphere(10, 2),
            Err(MeshError::TooFewSegments { what: "longitudes", .. })
        ));
    }

    #[test]
    fn oversized_resolution_is_an_error() {
        assert!(matches!(
            sphere(u32::MAX, 3),
            Err(MeshError::TooManyVertices { shape: "sphere" })
        ));
    }

    #[test]
    fn bands_vary_a_single_channel() {
        let mut mesh = sphere(10, 10).unwrap();
        paint_bands(&mut mesh, 10, &mut StdRng::seed_from_u64(7));

        let fixed: Vec<usize> = (0..3)
            .filter(|&ch| mesh.vertices.iter().all(|v| v.colour[ch] == 0.5))
            .collect();
        assert_eq!(fixed.len(), 2);
        let varying = (0..3).find(|ch| !fixed.contains(ch)).unwrap();
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (0.0..0.6).contains(&v.colour[varying]) && v.colour[3] == 1.0));
    }
}
