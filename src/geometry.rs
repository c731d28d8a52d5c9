use glam::Vec3;

/// Un-normalised normal of the triangle `a, b, c`; its length is twice the triangle's area,
/// so summing these weights larger faces more heavily.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Sum the face normals of every triangle touching a vertex and normalise the result.
///
/// Vertices that no triangle touches, or whose contributions cancel out, get `+Y`.
pub fn accumulate_normals(positions: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c] in triangles {
        let normal = face_normal(
            positions[a as usize],
            positions[b as usize],
            positions[c as usize],
        );
        for idx in [a, b, c] {
            normals[idx as usize] += normal;
        }
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn shared_vertex_averages_both_faces() {
        // two faces folded along the x axis: one facing +Y, one facing +Z
        let positions = [Vec3::ZERO, Vec3::X, -Vec3::Z, Vec3::Y];
        let triangles = [[0, 1, 2], [0, 1, 3]];
        let normals = accumulate_normals(&positions, &triangles);

        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(normals[0].x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(normals[0].y, expected.y, epsilon = 1e-6);
        assert_relative_eq!(normals[0].z, expected.z, epsilon = 1e-6);
        assert_relative_eq!(normals[2].y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(normals[3].z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn untouched_vertex_points_up() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE];
        let normals = accumulate_normals(&positions, &[[0, 2, 1]]);
        assert_eq!(normals[3], Vec3::Y);
    }
}
