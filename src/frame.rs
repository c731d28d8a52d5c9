use glium::{
    index::{NoIndices, PrimitiveType},
    texture::{SrgbTexture2d, Texture2d},
    uniform, Display, DrawError, DrawParameters, Frame, PolygonMode, Surface,
};
use glutin::surface::WindowSurface;

use crate::{
    buffer::{flat_normal_texture, white_texture, DisplayMesh, GpuMesh},
    error::GpuError,
    load::Material,
    model::DrawMode,
    scene::Scene,
    shader::Programs,
};

/// Owns everything that lives on the GPU and draws the scene with it
pub struct Application {
    params: DrawParameters<'static>,
    programs: Programs,
    /// Parallel to [`Scene::meshes`]
    meshes: Vec<GpuMesh>,
    white: SrgbTexture2d,
    flat_normal: Texture2d,
    plain: Material,
}

impl Application {
    pub fn new(display: &Display<WindowSurface>, scene: &Scene) -> Result<Self, GpuError> {
        let meshes = scene
            .meshes
            .iter()
            .map(|mesh| GpuMesh::try_from(DisplayMesh(mesh, display)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut plain = Material::named("plain");
        plain.ambient = [0.2; 3];
        plain.diffuse = [0.8; 3];

        Ok(Self {
            params: glium::DrawParameters {
                depth: glium::Depth {
                    test: glium::DepthTest::IfLess,
                    write: true,
                    ..Default::default()
                },
                blend: glium::Blend::alpha_blending(),
                polygon_mode: PolygonMode::Fill,
                point_size: Some(2.0),
                ..Default::default()
            },
            programs: Programs::new(display)?,
            meshes,
            white: white_texture(display)?,
            flat_normal: flat_normal_texture(display)?,
            plain,
        })
    }

    pub fn draw_frame(&self, target: &mut Frame, scene: &Scene) -> Result<(), DrawError> {
        target.clear_color_and_depth((0.1, 0.1, 0.1, 1.0), 1.0);

        let view = scene.camera.view().to_cols_array_2d();
        let projection = scene.camera.projection().to_cols_array_2d();
        let lightpos = scene.light_position().to_array();
        let colourmode = scene.colour_mode.as_uniform();

        for entity in &scene.entities {
            let program = self.programs.get(entity.shader);
            let params = DrawParameters {
                polygon_mode: match entity.draw_mode {
                    DrawMode::Lines => PolygonMode::Line,
                    _ => PolygonMode::Fill,
                },
                ..self.params.clone()
            };

            for &part in &entity.parts {
                let gpu = &self.meshes[part];
                let material = scene.meshes[part].material.as_ref().unwrap_or(&self.plain);
                let uniforms = uniform! {
                    model: entity.transform.matrix.to_cols_array_2d(),
                    view: view,
                    projection: projection,
                    lightpos: lightpos,
                    colourmode: colourmode,
                    emitmode: entity.emit.as_uniform(),
                    ambient: material.ambient,
                    diffuse: material.diffuse,
                    specular: material.specular,
                    emissive: material.emissive,
                    shininess: material.shininess,
                    opacity: material.opacity,
                    diffuse_tex: gpu.diffuse.as_ref().unwrap_or(&self.white),
                    specular_tex: gpu.specular.as_ref().unwrap_or(&self.white),
                    bump_tex: gpu.bump.as_ref().unwrap_or(&self.flat_normal),
                    bumped: gpu.bump.is_some(),
                };

                if entity.draw_mode == DrawMode::Points {
                    target.draw(
                        &gpu.vertices,
                        NoIndices(PrimitiveType::Points),
                        program,
                        &uniforms,
                        &params,
                    )?;
                    continue;
                }
                for indices in &gpu.batches {
                    target.draw(&gpu.vertices, indices, program, &uniforms, &params)?;
                }
            }
        }
        Ok(())
    }
}
