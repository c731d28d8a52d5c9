use glium::{
    index::PrimitiveType,
    texture::{RawImage2d, SrgbTexture2d, Texture2d},
    Display, IndexBuffer, VertexBuffer,
};
use glutin::surface::WindowSurface;
use image::RgbaImage;

use crate::{
    error::GpuError,
    mesh::{Mesh, Primitive, Vertex},
    scene::SceneMesh,
};

impl From<Primitive> for PrimitiveType {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Triangles => PrimitiveType::TrianglesList,
            Primitive::TriangleStrip => PrimitiveType::TriangleStrip,
            Primitive::TriangleFan => PrimitiveType::TriangleFan,
        }
    }
}

/// A mesh that lives on the GPU: one vertex buffer and an index buffer per batch
pub struct GpuMesh {
    pub vertices: VertexBuffer<Vertex>,
    pub batches: Vec<IndexBuffer<u32>>,
    pub diffuse: Option<SrgbTexture2d>,
    pub specular: Option<SrgbTexture2d>,
    /// Tangent-space normals, stored linear
    pub bump: Option<Texture2d>,
}

pub struct DisplayMesh<'a>(pub &'a SceneMesh, pub &'a Display<WindowSurface>);

impl TryFrom<DisplayMesh<'_>> for GpuMesh {
    type Error = GpuError;
    fn try_from(DisplayMesh(scene_mesh, display): DisplayMesh) -> Result<Self, GpuError> {
        let mesh: &Mesh = &scene_mesh.mesh;
        mesh.validate()?;

        let vertices = VertexBuffer::new(display, &mesh.vertices)?;
        let batches = mesh
            .batches
            .iter()
            .map(|batch| {
                IndexBuffer::new(display, batch.primitive.into(), mesh.batch_indices(batch))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let maps = &scene_mesh.maps;
        let colour_map = |map: &Option<RgbaImage>| {
            map.as_ref()
                .map(|image| upload_texture(display, image))
                .transpose()
        };

        Ok(Self {
            vertices,
            batches,
            diffuse: colour_map(&maps.diffuse)?,
            specular: colour_map(&maps.specular)?,
            bump: maps
                .bump
                .as_ref()
                .map(|image| upload_normal_map(display, image))
                .transpose()?,
        })
    }
}

/// Images are stored top row first, OpenGL expects the bottom row first
pub fn upload_texture(
    display: &Display<WindowSurface>,
    image: &RgbaImage,
) -> Result<SrgbTexture2d, GpuError> {
    let raw = RawImage2d::from_raw_rgba_reversed(image.as_raw(), image.dimensions());
    Ok(SrgbTexture2d::new(display, raw)?)
}

pub fn upload_normal_map(
    display: &Display<WindowSurface>,
    image: &RgbaImage,
) -> Result<Texture2d, GpuError> {
    let raw = RawImage2d::from_raw_rgba_reversed(image.as_raw(), image.dimensions());
    Ok(Texture2d::new(display, raw)?)
}

/// Bound in place of a missing diffuse or specular map so textured models keep their
/// material colours
pub fn white_texture(display: &Display<WindowSurface>) -> Result<SrgbTexture2d, GpuError> {
    upload_texture(display, &RgbaImage::from_pixel(1, 1, image::Rgba([255; 4])))
}

/// A normal map whose only texel decodes to the unperturbed `+Z`
pub fn flat_normal_map() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, image::Rgba([128, 128, 255, 255]))
}

pub fn flat_normal_texture(display: &Display<WindowSurface>) -> Result<Texture2d, GpuError> {
    upload_normal_map(display, &flat_normal_map())
}
