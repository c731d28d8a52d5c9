use std::ops::Range;

use itertools::Itertools;

use crate::error::MeshError;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub colour: [f32; 4],
    pub texture: [f32; 2],
}

glium::implement_vertex!(Vertex, position, normal, colour, texture);

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            colour: [1.0; 4],
            texture: [0.0; 2],
        }
    }

    pub fn with_colour(mut self, colour: [f32; 4]) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_texture(mut self, texture: [f32; 2]) -> Self {
        self.texture = texture;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// A run of the index buffer drawn with a single primitive type
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub primitive: Primitive,
    pub indices: Range<usize>,
}

/// CPU side geometry: the vertex pool plus the index runs that draw it.
///
/// Builders append whole batches, so a strip or fan never crosses a batch boundary and
/// each batch can be uploaded as its own index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub batches: Vec<Batch>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn push_batch(&mut self, primitive: Primitive, indices: impl IntoIterator<Item = u32>) {
        let start = self.indices.len();
        self.indices.extend(indices);
        self.batches.push(Batch {
            primitive,
            indices: start..self.indices.len(),
        });
    }

    pub fn batch_indices(&self, batch: &Batch) -> &[u32] {
        &self.indices[batch.indices.clone()]
    }

    /// Expand every batch into independent triangles, following the OpenGL rules for strips
    /// (odd triangles swap their first two corners) and fans (the first index is shared).
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let mut triangles = Vec::with_capacity(self.indices.len());
        for batch in &self.batches {
            let indices = self.batch_indices(batch);
            match batch.primitive {
                Primitive::Triangles => triangles.extend(
                    indices
                        .chunks_exact(3)
                        .map(|tri| [tri[0], tri[1], tri[2]]),
                ),
                Primitive::TriangleStrip => triangles.extend(
                    indices
                        .iter()
                        .tuple_windows()
                        .enumerate()
                        .map(|(i, (&a, &b, &c))| if i % 2 == 0 { [a, b, c] } else { [b, a, c] }),
                ),
                Primitive::TriangleFan => {
                    if let Some((&centre, rim)) = indices.split_first() {
                        triangles.extend(
                            rim.iter()
                                .tuple_windows()
                                .map(|(&b, &c)| [centre, b, c]),
                        );
                    }
                }
            }
        }
        triangles
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        let len = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&idx| idx as usize >= len) {
            return Err(MeshError::IndexOutOfRange { index, len });
        }
        for (i, batch) in self.batches.iter().enumerate() {
            let count = batch.indices.len();
            let valid = match batch.primitive {
                Primitive::Triangles => count % 3 == 0,
                Primitive::TriangleStrip | Primitive::TriangleFan => count >= 3,
            };
            if !valid {
                return Err(MeshError::MalformedBatch {
                    batch: i,
                    len: count,
                    primitive: batch.primitive,
                });
            }
        }
        Ok(())
    }

    pub fn set_colour(&mut self, colour: [f32; 4]) {
        for vertex in &mut self.vertices {
            vertex.colour = colour;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let corners = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        Mesh::new(
            corners
                .iter()
                .map(|&p| Vertex::new(p, [0.0, 0.0, 1.0]))
                .collect(),
        )
    }

    #[test]
    fn strip_alternates_winding() {
        let mut mesh = quad();
        mesh.push_batch(Primitive::TriangleStrip, [0, 1, 2, 3]);
        assert_eq!(mesh.triangles(), vec![[0, 1, 2], [2, 1, 3]]);
    }

    #[test]
    fn fan_shares_first_index() {
        let mut mesh = quad();
        mesh.push_batch(Primitive::TriangleFan, [0, 1, 3, 2]);
        assert_eq!(mesh.triangles(), vec![[0, 1, 3], [0, 3, 2]]);
    }

    #[test]
    fn batches_keep_their_own_ranges() {
        let mut mesh = quad();
        mesh.push_batch(Primitive::Triangles, [0, 1, 2]);
        mesh.push_batch(Primitive::Triangles, [2, 1, 3]);
        assert_eq!(mesh.batches[1].indices, 3..6);
        assert_eq!(mesh.batch_indices(&mesh.batches[1]), &[2, 1, 3]);
        assert_eq!(mesh.triangles().len(), 2);
    }

    #[test]
    fn validate_rejects_dangling_index() {
        let mut mesh = quad();
        mesh.push_batch(Primitive::Triangles, [0, 1, 4]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn validate_rejects_short_fan() {
        let mut mesh = quad();
        mesh.push_batch(Primitive::TriangleFan, [0, 1]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::MalformedBatch { batch: 0, len: 2, .. })
        ));
    }
}
