//! The demo's objects and everything the keyboard and the clock do to them.
//!
//! Nothing in here touches OpenGL: meshes stay on the CPU until `buffer` uploads them, so the
//! whole scene can be built and driven in tests.

use std::{f32::consts::PI, ops::Range};

use glam::{Vec3, Vec4};
use log::info;
use rand::Rng;

use crate::{
    camera::Camera,
    config::{Config, TerrainSource},
    controls::{Action, Slot, KEYBOARD_HELP},
    error::MeshError,
    heightfield::Heightfield,
    load::{Material, MaterialMaps, WavefrontModel},
    mesh::Mesh,
    model::{ColourMode, DrawMode, EmitMode, Model, Transform},
    shapes, terrain,
};

const KEY_SPEED: f32 = 0.05;
const LIGHT_KEY_SPEED: f32 = 0.5;
const INITIAL_SPEED: f64 = 10.0;

/// Program an entity is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    /// Per-vertex lighting
    Default,
    /// Per-fragment lighting with a specular highlight
    Shiny,
    /// Material colours and the diffuse map
    Textured,
}

/// Geometry shared by one or more entities
#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub mesh: Mesh,
    pub material: Option<Material>,
    pub maps: MaterialMaps,
}

impl From<Mesh> for SceneMesh {
    fn from(mesh: Mesh) -> Self {
        Self {
            mesh,
            material: None,
            maps: MaterialMaps::default(),
        }
    }
}

pub struct Entity {
    pub name: String,
    pub transform: Transform,
    pub draw_mode: DrawMode,
    pub shader: ShaderKind,
    pub emit: EmitMode,
    /// Indices into [`Scene::meshes`]
    pub parts: Vec<usize>,
}

impl Entity {
    fn new(name: impl Into<String>, shader: ShaderKind, parts: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            draw_mode: DrawMode::default(),
            shader,
            emit: EmitMode::Coloured,
            parts,
        }
    }
}

impl Model for Entity {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    Entity(usize),
    Camera,
}

/// Something the caller has to act on after [`Scene::apply`]
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Quit,
    Print(String),
}

/// Entity indices of the fixed demo objects
struct Slots {
    cube: usize,
    sphere: usize,
    cylinder: usize,
    small_cylinder: usize,
    cog: usize,
    small_cog: usize,
    light: usize,
    terrain: usize,
    loaded: Option<usize>,
    planets: Range<usize>,
}

pub struct Scene {
    pub meshes: Vec<SceneMesh>,
    pub entities: Vec<Entity>,
    pub camera: Camera,
    pub colour_mode: ColourMode,
    /// Animation speed, changed with C and V
    pub speed: f64,
    title: String,
    slots: Slots,
    selected: Selection,
    animation_progress: f32,
}

impl Scene {
    pub fn build(
        config: &Config,
        model: Option<WavefrontModel>,
        rng: &mut impl Rng,
    ) -> Result<Self, MeshError> {
        let mut meshes: Vec<SceneMesh> = Vec::new();
        let mut entities = Vec::new();
        let mut add = |mesh: Mesh, entity: Entity| {
            meshes.push(mesh.into());
            entities.push(Entity {
                parts: vec![meshes.len() - 1],
                ..entity
            });
            entities.len() - 1
        };

        let cube = add(
            shapes::cube(),
            Entity::new("The Cube", ShaderKind::Shiny, Vec::new()),
        );
        let sphere = add(
            banded_sphere(config.sphere_resolution, rng)?,
            Entity::new("The Sphere", ShaderKind::Default, Vec::new()),
        );
        let cylinder = add(
            shapes::cylinder(15, 0.4, 0.1)?,
            Entity::new("The Cylinder", ShaderKind::Shiny, Vec::new()),
        );
        let small_cylinder = add(
            shapes::cylinder(10, 1.0, 0.03)?,
            Entity::new("Small Cylinder", ShaderKind::Shiny, Vec::new()),
        );
        let cog = add(
            shapes::cog(100, 0.04, 0.45, 0.5)?,
            Entity::new("The Cog", ShaderKind::Shiny, Vec::new()),
        );
        let small_cog = add(
            shapes::cog(60, 0.04, 0.24, 0.3)?,
            Entity::new("The Small Cog", ShaderKind::Shiny, Vec::new()),
        );
        let light = add(
            banded_sphere(config.light_resolution, rng)?,
            Entity {
                emit: EmitMode::Bright,
                ..Entity::new("Light Point", ShaderKind::Default, Vec::new())
            },
        );
        let terrain = add(
            build_terrain(config, rng)?,
            Entity::new("Terrain", ShaderKind::Default, Vec::new()),
        );

        // every planet draws the same mesh
        meshes.push(banded_sphere(config.sphere_resolution, rng)?.into());
        let planet_mesh = meshes.len() - 1;
        let first_planet = entities.len();
        entities.extend((0..config.planets).map(|i| {
            Entity::new(format!("Planet {i}"), ShaderKind::Shiny, vec![planet_mesh])
        }));
        let planets = first_planet..entities.len();

        let loaded = model.map(|model| {
            let parts = model
                .objects
                .into_iter()
                .map(|object| {
                    meshes.push(SceneMesh {
                        mesh: object.mesh,
                        material: object.material,
                        maps: object.maps,
                    });
                    meshes.len() - 1
                })
                .collect();
            entities.push(Entity::new(model.name, ShaderKind::Textured, parts));
            entities.len() - 1
        });

        let mut scene = Self {
            meshes,
            entities,
            camera: Camera::new(config.width, config.height),
            colour_mode: ColourMode::default(),
            speed: INITIAL_SPEED,
            title: config.title.clone(),
            slots: Slots {
                cube,
                sphere,
                cylinder,
                small_cylinder,
                cog,
                small_cog,
                light,
                terrain,
                loaded,
                planets,
            },
            selected: Selection::Entity(light),
            animation_progress: 0.0,
        };
        scene.place_models();
        scene.animate(0.0);
        info!(
            "scene ready: {} entities over {} meshes",
            scene.entities.len(),
            scene.meshes.len()
        );
        Ok(scene)
    }

    fn place_models(&mut self) {
        let placements = [
            (self.slots.cube, Vec3::new(1.0, 0.0, 0.0), 1.0),
            (self.slots.cylinder, Vec3::new(1.0, 0.4, 0.0), 1.0),
            (self.slots.small_cylinder, Vec3::new(1.75, 0.25, 0.0), 1.0),
            (self.slots.cog, Vec3::new(1.0, 0.5, 0.0), 1.0),
            (self.slots.small_cog, Vec3::new(1.75, 0.5, 0.0), 1.0),
            (self.slots.sphere, Vec3::new(-1.0, 0.0, 0.0), 1.0 / 3.0),
            (self.slots.light, Vec3::new(0.0, 0.0, 1.0), 0.05),
            (self.slots.terrain, Vec3::new(0.0, -1.0, 0.0), 1.0),
        ];
        for (index, offset, scale) in placements {
            let entity = &mut self.entities[index];
            entity.reset_model();
            entity.translate(offset);
            entity.scale(Vec3::splat(scale));
        }
    }

    pub fn selected(&self) -> &dyn Model {
        match self.selected {
            Selection::Entity(index) => &self.entities[index],
            Selection::Camera => &self.camera,
        }
    }

    fn selected_mut(&mut self) -> &mut dyn Model {
        match self.selected {
            Selection::Entity(index) => &mut self.entities[index],
            Selection::Camera => &mut self.camera,
        }
    }

    pub fn light(&self) -> &Entity {
        &self.entities[self.slots.light]
    }

    fn select(&mut self, slot: Slot) {
        let slots = &self.slots;
        self.selected = match slot {
            Slot::Cube => Selection::Entity(slots.cube),
            Slot::Sphere => Selection::Entity(slots.sphere),
            Slot::Cylinder => Selection::Entity(slots.cylinder),
            Slot::Cog => Selection::Entity(slots.cog),
            Slot::SmallCog => Selection::Entity(slots.small_cog),
            Slot::Terrain => Selection::Entity(slots.terrain),
            Slot::Loaded => Selection::Entity(slots.loaded.unwrap_or(slots.light)),
            Slot::SmallCylinder => Selection::Entity(slots.small_cylinder),
            Slot::Camera => Selection::Camera,
            Slot::LightPoint => Selection::Entity(slots.light),
        };
    }

    fn key_speed(&self) -> f32 {
        if self.selected == Selection::Entity(self.slots.light) {
            LIGHT_KEY_SPEED
        } else {
            KEY_SPEED
        }
    }

    pub fn apply(&mut self, action: Action) -> Option<Outcome> {
        let key_speed = self.key_speed();
        match action {
            Action::Select(slot) => self.select(slot),
            Action::Move(direction) => self.selected_mut().translate(direction * key_speed),
            Action::Rotate(axis) => self.selected_mut().rotate(key_speed, axis),
            Action::Zoom(amount) => self.selected_mut().scale(Vec3::splat(1.0 + amount)),
            Action::ChangeSpeed(step) => self.speed += step,
            Action::ToggleColourMode => {
                self.colour_mode = self.colour_mode.toggle();
                return Some(Outcome::Print(format!("Color Mode: {}", self.colour_mode)));
            }
            Action::CycleDrawMode => {
                let model = self.selected_mut();
                model.set_draw_mode(model.draw_mode().next());
                return Some(Outcome::Print(format!(
                    "{} Draw Mode: {}",
                    model.name(),
                    model.draw_mode()
                )));
            }
            Action::Help => return Some(Outcome::Print(KEYBOARD_HELP.to_string())),
            Action::PrintSelected => return Some(Outcome::Print(self.describe_selected())),
            Action::Quit => return Some(Outcome::Quit),
        }
        None
    }

    fn describe_selected(&self) -> String {
        if self.selected == Selection::Camera {
            return self.camera.to_string();
        }
        let model = self.selected();
        let transform = model.transform();
        format!(
            "{} --> {}\nmodel: {}\nposition: {}",
            model.name(),
            model.draw_mode(),
            transform.matrix,
            transform.position
        )
    }

    /// Advance the cogs and planets by `delta` animation steps
    pub fn animate(&mut self, delta: f64) {
        let angle = (self.speed * delta) as f32;
        self.entities[self.slots.cog].rotate(angle, Vec3::Y);
        self.entities[self.slots.small_cog].rotate(-1.5 * angle, Vec3::Y);

        let count = self.slots.planets.len();
        for (i, index) in self.slots.planets.clone().enumerate() {
            let remaining = (count - i) as f32;
            self.animation_progress += delta as f32 * remaining;
            let step = (360.0 / 100_000.0 * remaining * self.animation_progress) * PI / 180.0;

            let i = i as f32;
            let offset = Vec3::new(i * 1.3 * step.cos(), i * i.cos(), i * 0.8 * step.sin());
            let planet = &mut self.entities[index];
            planet.reset_model();
            planet.translate(offset);
            planet.scale(Vec3::splat(0.05 * i));
        }
    }

    /// The light point's position in eye space
    pub fn light_position(&self) -> Vec4 {
        self.camera.view() * self.light().transform.position.extend(1.0)
    }

    pub fn title(&self) -> String {
        format!("{} --> {}", self.title, self.selected().name())
    }
}

fn banded_sphere((lats, longs): (u32, u32), rng: &mut impl Rng) -> Result<Mesh, MeshError> {
    let mut mesh = shapes::sphere(lats, longs)?;
    shapes::paint_bands(&mut mesh, longs, rng);
    Ok(mesh)
}

fn build_terrain(config: &Config, rng: &mut impl Rng) -> Result<Mesh, MeshError> {
    let field = match config.terrain {
        TerrainSource::Simplex {
            xsize,
            zsize,
            noise,
        } => Heightfield::from_simplex(xsize, zsize, &noise)?,
        TerrainSource::Mountains(params) => {
            let mut field = Heightfield::from_midpoint_displacement(&params, rng)?;
            field.normalize();
            field
        }
    };
    terrain::terrain(&field, config.terrain_width, config.terrain_depth)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{heightfield::NoiseParams, load::parse_wavefront};

    fn small_config() -> Config {
        Config {
            sphere_resolution: (6, 8),
            light_resolution: (4, 4),
            planets: 5,
            terrain: TerrainSource::Simplex {
                xsize: 8,
                zsize: 8,
                noise: NoiseParams::default(),
            },
            ..Config::default()
        }
    }

    fn scene() -> Scene {
        Scene::build(&small_config(), None, &mut StdRng::seed_from_u64(5)).unwrap()
    }

    fn origin_of(entity: &Entity) -> Vec3 {
        entity.transform.matrix.transform_point3(Vec3::ZERO)
    }

    #[test]
    fn light_point_starts_selected() {
        let scene = scene();
        assert_eq!(scene.selected().name(), "Light Point");
        assert_eq!(scene.title(), "Selected Model --> Light Point");
    }

    #[test]
    fn planets_share_one_mesh() {
        let scene = scene();
        let planets = &scene.entities[scene.slots.planets.clone()];
        assert_eq!(planets.len(), 5);
        assert!(planets.iter().all(|p| p.parts == planets[0].parts));
        assert!(scene.meshes.iter().all(|m| m.mesh.validate().is_ok()));
    }

    #[test]
    fn number_keys_select() {
        let mut scene = scene();
        scene.apply(Action::Select(Slot::Cog));
        assert_eq!(scene.selected().name(), "The Cog");
        scene.apply(Action::Select(Slot::Camera));
        assert_eq!(scene.selected().name(), "Camera / View");
        // nothing loaded, so 7 falls back to the light
        scene.apply(Action::Select(Slot::Loaded));
        assert_eq!(scene.selected().name(), "Light Point");
    }

    #[test]
    fn light_moves_faster_than_models() {
        let mut scene = scene();
        scene.apply(Action::Move(Vec3::X));
        assert_relative_eq!(scene.light().transform.position.x, 0.5);

        scene.apply(Action::Select(Slot::Cube));
        scene.apply(Action::Move(Vec3::NEG_Y));
        let cube = &scene.entities[scene.slots.cube];
        assert_relative_eq!(origin_of(cube).y, -0.05, epsilon = 1e-6);
        assert_relative_eq!(origin_of(cube).x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zoom_scales_the_selected_model() {
        let mut scene = scene();
        scene.apply(Action::Select(Slot::Cube));
        scene.apply(Action::Zoom(0.02));
        let cube = &scene.entities[scene.slots.cube];
        let unit = cube.transform.matrix.transform_vector3(Vec3::X);
        assert_relative_eq!(unit.length(), 1.02, epsilon = 1e-6);
    }

    #[test]
    fn light_position_is_in_eye_space() {
        let scene = scene();
        let light = scene.light_position();
        assert_relative_eq!(light.z, -1.5, epsilon = 1e-5);
        assert_relative_eq!(light.w, 1.0);
    }

    #[test]
    fn cogs_turn_in_opposite_directions() {
        let mut scene = scene();
        scene.animate(0.1);
        let turned = |index: usize| {
            let x = scene.entities[index].transform.matrix.transform_vector3(Vec3::X);
            // positive angles about y carry x towards -z
            -x.z
        };
        assert!(turned(scene.slots.cog) > 0.0);
        assert!(turned(scene.slots.small_cog) < 0.0);
        assert_relative_eq!(
            turned(scene.slots.small_cog).asin(),
            -1.5 * turned(scene.slots.cog).asin(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn planets_follow_their_orbits() {
        let mut scene = scene();
        let third = scene.slots.planets.start + 2;
        assert_relative_eq!(origin_of(&scene.entities[third]).x, 2.6, epsilon = 1e-5);
        assert_relative_eq!(origin_of(&scene.entities[third]).y, 2.0 * 2f32.cos(), epsilon = 1e-5);

        scene.animate(1000.0);
        let p = origin_of(&scene.entities[third]);
        // still on the ellipse with half axes 2.6 and 1.6
        assert_relative_eq!((p.x / 2.6).powi(2) + (p.z / 1.6).powi(2), 1.0, epsilon = 1e-4);
        assert!(p.z.abs() > 1e-3);
    }

    #[test]
    fn speed_and_modes() {
        let mut scene = scene();
        scene.apply(Action::ChangeSpeed(-1.0));
        assert_eq!(scene.speed, 9.0);

        let printed = scene.apply(Action::ToggleColourMode);
        assert_eq!(
            printed,
            Some(Outcome::Print("Color Mode: [ Solid Color ]".to_string()))
        );

        scene.apply(Action::Select(Slot::Sphere));
        let printed = scene.apply(Action::CycleDrawMode);
        assert_eq!(
            printed,
            Some(Outcome::Print("The Sphere Draw Mode: [ Draw Points ]".to_string()))
        );
        assert_eq!(scene.apply(Action::Quit), Some(Outcome::Quit));
    }

    #[test]
    fn loaded_model_gets_slot_seven() {
        let model = parse_wavefront(b"o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mut scene =
            Scene::build(&small_config(), Some(model), &mut StdRng::seed_from_u64(1)).unwrap();
        scene.apply(Action::Select(Slot::Loaded));
        assert_eq!(scene.selected().name(), "wavefront");
        let entity = scene.entities.last().unwrap();
        assert_eq!(entity.shader, ShaderKind::Textured);
        assert_eq!(entity.parts.len(), 1);
    }
}
