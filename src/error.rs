use std::path::PathBuf;

use thiserror::Error;

/// Invalid parameters handed to one of the mesh builders
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("{shape} needs at least {min} {what}, got {got}")]
    TooFewSegments {
        shape: &'static str,
        what: &'static str,
        min: u32,
        got: u32,
    },
    #[error("{shape} needs more vertices than 32-bit indices can address")]
    TooManyVertices { shape: &'static str },
    #[error("fractal dimension must lie strictly between 0 and 1, got {0}")]
    FractalOutOfRange(f32),
    #[error("index {index} points past the {len} vertices of the mesh")]
    IndexOutOfRange { index: u32, len: usize },
    #[error("batch {batch} holds {len} indices, which is not a valid {primitive:?} run")]
    MalformedBatch {
        batch: usize,
        len: usize,
        primitive: crate::mesh::Primitive,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse wavefront data from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: obj::ObjError,
    },
    #[error("object `{object}` references {kind} {index}, but only {len} are defined")]
    MissingIndex {
        object: String,
        kind: &'static str,
        index: usize,
        len: usize,
    },
    #[error("object `{object}` has a relative {kind} index reaching {offset} before the first one")]
    IndexBeforeStart {
        object: String,
        kind: &'static str,
        offset: usize,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Failures while moving scene data onto the GPU
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("mesh cannot be uploaded: {0}")]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    VertexBuffer(#[from] glium::vertex::BufferCreationError),
    #[error(transparent)]
    IndexBuffer(#[from] glium::index::BufferCreationError),
    #[error(transparent)]
    Texture(#[from] glium::texture::TextureCreationError),
    #[error(transparent)]
    Program(#[from] glium::program::ProgramChooserCreationError),
}
