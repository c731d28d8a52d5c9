//! Wavefront `.obj` / `.mtl` loading.
//!
//! The `obj` crate does the tokenising; this module turns its index tuples into one indexed
//! triangle mesh per object, sharing a vertex wherever the same (position, texture, normal)
//! triple repeats.

use std::{
    io::{self, BufRead, Read},
    path::{Path, PathBuf},
};

use glam::Vec3;
use image::RgbaImage;
use itertools::Itertools;
use log::{debug, info, warn};
use obj::{IndexTuple, ObjData, ObjMaterial, SimplePolygon};
use rustc_hash::FxHashMap;

use crate::{
    error::LoadError,
    geometry::accumulate_normals,
    mesh::{Mesh, Primitive, Vertex},
};

/// Surface description from a `newmtl` block
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub emissive: [f32; 3],
    pub shininess: f32,
    pub opacity: f32,
    pub optical_density: f32,
    pub illumination: i32,
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub bump_map: Option<String>,
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            emissive: [0.0; 3],
            shininess: 0.0,
            opacity: 1.0,
            optical_density: 1.0,
            illumination: 1,
            diffuse_map: None,
            specular_map: None,
            bump_map: None,
        }
    }
}

impl From<&obj::Material> for Material {
    fn from(m: &obj::Material) -> Self {
        let defaults = Self::named(m.name.clone());
        Self {
            ambient: m.ka.unwrap_or(defaults.ambient),
            diffuse: m.kd.unwrap_or(defaults.diffuse),
            specular: m.ks.unwrap_or(defaults.specular),
            emissive: m.ke.unwrap_or(defaults.emissive),
            shininess: m.ns.unwrap_or(defaults.shininess),
            // `Tr` is the inverse of `d`; `d` wins when both are present
            opacity: m.d.or(m.tr.map(|tr| 1.0 - tr)).unwrap_or(defaults.opacity),
            optical_density: m.ni.unwrap_or(defaults.optical_density),
            illumination: m.illum.unwrap_or(defaults.illumination),
            diffuse_map: m.map_kd.clone(),
            specular_map: m.map_ks.clone(),
            bump_map: m.map_bump.clone(),
            ..defaults
        }
    }
}

impl From<&ObjMaterial> for Material {
    fn from(m: &ObjMaterial) -> Self {
        match m {
            ObjMaterial::Ref(name) => Self::named(name.clone()),
            ObjMaterial::Mtl(material) => Self::from(material.as_ref()),
        }
    }
}

/// Decoded texture maps of a material; maps that are missing or fail to decode stay `None`
#[derive(Clone, Debug, Default)]
pub struct MaterialMaps {
    pub diffuse: Option<RgbaImage>,
    pub specular: Option<RgbaImage>,
    pub bump: Option<RgbaImage>,
}

impl MaterialMaps {
    pub fn load(material: &Material, dir: &Path) -> Self {
        let load = |map: &Option<String>| {
            let name = map.as_deref()?;
            let path = dir.join(name);
            match decode_map(&path) {
                Ok(image) => {
                    info!("loaded texture {}", path.display());
                    Some(image)
                }
                Err(e) => {
                    warn!("skipping texture {}: {e}", path.display());
                    None
                }
            }
        };
        Self {
            diffuse: load(&material.diffuse_map),
            specular: load(&material.specular_map),
            bump: load(&material.bump_map),
        }
    }
}

fn decode_map(path: &Path) -> Result<RgbaImage, LoadError> {
    Ok(image::open(path)?.to_rgba8())
}

/// One `o` block of a wavefront file
#[derive(Clone, Debug)]
pub struct ObjectMesh {
    pub name: String,
    pub mesh: Mesh,
    pub material: Option<Material>,
    pub maps: MaterialMaps,
}

#[derive(Clone, Debug)]
pub struct WavefrontModel {
    pub name: String,
    pub objects: Vec<ObjectMesh>,
}

impl WavefrontModel {
    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.vertices.len()).sum()
    }
}

/// Shown in place of a path for data that did not come from a file
const IN_MEMORY: &str = "<in-memory>";

/// Parse an in-memory `.obj` file. Material names are kept but no libraries are read.
pub fn parse_wavefront(bytes: &[u8]) -> Result<WavefrontModel, LoadError> {
    let data = ObjData::load_buf(bytes).map_err(|source| LoadError::Parse {
        path: PathBuf::from(IN_MEMORY),
        source,
    })?;
    assemble(&data, "wavefront")
}

/// A path of `-` reads the model from standard input, anything else goes to
/// [`load_wavefront`].
pub fn load_model(path: &Path) -> Result<WavefrontModel, LoadError> {
    if path != Path::new("-") {
        return load_wavefront(path);
    }
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .map_err(|e| LoadError::Parse {
            path: PathBuf::from("<stdin>"),
            source: e.into(),
        })?;
    parse_wavefront(&bytes)
}

/// Load a `.obj` file, its material libraries and their texture maps.
///
/// Libraries or textures that cannot be read are logged and left out.
pub fn load_wavefront(path: impl AsRef<Path>) -> Result<WavefrontModel, LoadError> {
    let path = path.as_ref();
    info!("loading {}", path.display());
    let mut obj = obj::Obj::load(path).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })?;
    link_materials(&mut obj, |dir, name| {
        std::fs::File::open(dir.join(name)).map(io::BufReader::new)
    });

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wavefront".to_string());
    let mut model = assemble(&obj.data, &name)?;
    for object in &mut model.objects {
        if let Some(material) = &object.material {
            object.maps = MaterialMaps::load(material, &obj.path);
        }
    }
    info!(
        "loaded {} objects ({} vertices) from {}",
        model.objects.len(),
        model.vertex_count(),
        path.display()
    );
    Ok(model)
}

/// Read the material libraries named by `mtllib` and attach their materials to the groups
/// that use them. A library that fails to parse is skipped as a whole.
pub fn link_materials<R: BufRead>(
    obj: &mut obj::Obj,
    resolve: impl FnMut(&Path, &str) -> io::Result<R>,
) {
    for lib in &obj.data.material_libs {
        info!("loading material library {}", lib.filename);
    }
    if let Err(obj::MtlLibsLoadError(failures)) = obj.load_mtls_fn(resolve) {
        for (lib, e) in failures {
            warn!("skipping material library {lib}: {e}");
        }
    }
}

/// Build one mesh per object from parsed wavefront data
pub fn assemble(data: &ObjData, name: &str) -> Result<WavefrontModel, LoadError> {
    let mut objects = Vec::with_capacity(data.objects.len());
    for object in &data.objects {
        let mut assembler = MeshAssembler::new(data, &object.name);
        for polygon in object.groups.iter().flat_map(|g| &g.polys) {
            assembler.polygon(polygon)?;
        }
        if assembler.is_empty() {
            debug!("dropping object `{}` without faces", object.name);
            continue;
        }

        let material = object
            .groups
            .iter()
            .rev()
            .find_map(|g| g.material.as_ref())
            .map(Material::from);
        let mut mesh = assembler.finish();
        if let Some(material) = &material {
            let [r, g, b] = material.diffuse;
            mesh.set_colour([r, g, b, material.opacity]);
        }
        objects.push(ObjectMesh {
            name: object.name.clone(),
            mesh,
            material,
            maps: MaterialMaps::default(),
        });
    }

    Ok(WavefrontModel {
        name: name.to_string(),
        objects,
    })
}

/// Collects the vertices and triangles of one object, reusing a vertex whenever the same
/// index tuple appears again.
struct MeshAssembler<'a> {
    data: &'a ObjData,
    object: &'a str,
    vertices: Vec<Vertex>,
    has_normal: Vec<bool>,
    indices: Vec<u32>,
    seen: FxHashMap<IndexTuple, u32>,
}

impl<'a> MeshAssembler<'a> {
    fn new(data: &'a ObjData, object: &'a str) -> Self {
        Self {
            data,
            object,
            vertices: Vec::new(),
            has_normal: Vec::new(),
            indices: Vec::new(),
            seen: FxHashMap::default(),
        }
    }

    fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn lookup<T: Copy>(
        &self,
        pool: &[T],
        kind: &'static str,
        index: usize,
    ) -> Result<T, LoadError> {
        if let Some(&value) = pool.get(index) {
            return Ok(value);
        }
        // a relative index past the start of its pool wraps around
        if isize::try_from(index).is_err() {
            return Err(LoadError::IndexBeforeStart {
                object: self.object.to_string(),
                kind,
                offset: index.wrapping_neg(),
            });
        }
        Err(LoadError::MissingIndex {
            object: self.object.to_string(),
            kind,
            index,
            len: pool.len(),
        })
    }

    fn vertex(&mut self, tuple: IndexTuple) -> Result<u32, LoadError> {
        if let Some(&index) = self.seen.get(&tuple) {
            return Ok(index);
        }

        let IndexTuple(p, t, n) = tuple;
        let position = self.lookup(&self.data.position, "position", p)?;
        let texture = match t {
            Some(t) => {
                let [u, v] = self.lookup(&self.data.texture, "texture coordinate", t)?;
                [u, 1.0 - v]
            }
            None => [0.0; 2],
        };
        let normal = match n {
            Some(n) => Some(
                Vec3::from(self.lookup(&self.data.normal, "normal", n)?)
                    .try_normalize()
                    .unwrap_or(Vec3::Y),
            ),
            None => None,
        };

        let index = self.vertices.len() as u32;
        self.vertices.push(
            Vertex::new(position, normal.unwrap_or(Vec3::Y).into()).with_texture(texture),
        );
        self.has_normal.push(normal.is_some());
        self.seen.insert(tuple, index);
        Ok(index)
    }

    /// Fan-triangulate a face around its first corner
    fn polygon(&mut self, SimplePolygon(corners): &SimplePolygon) -> Result<(), LoadError> {
        if corners.len() < 3 {
            debug!("skipping {}-corner face in `{}`", corners.len(), self.object);
            return Ok(());
        }
        let corners = corners
            .iter()
            .map(|&tuple| self.vertex(tuple))
            .collect::<Result<Vec<u32>, LoadError>>()?;
        let first = corners[0];
        for (b, c) in corners[1..].iter().tuple_windows() {
            self.indices.extend([first, *b, *c]);
        }
        Ok(())
    }

    fn finish(mut self) -> Mesh {
        if self.has_normal.iter().any(|&has| !has) {
            let positions: Vec<Vec3> = self
                .vertices
                .iter()
                .map(|v| Vec3::from(v.position))
                .collect();
            let triangles: Vec<[u32; 3]> = self
                .indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect();
            let normals = accumulate_normals(&positions, &triangles);
            let missing = self.has_normal.iter().map(|&has| !has);
            for ((vertex, normal), missing) in self.vertices.iter_mut().zip(normals).zip(missing) {
                if missing {
                    vertex.normal = normal.into();
                }
            }
        }

        let mut mesh = Mesh::new(self.vertices);
        mesh.push_batch(Primitive::Triangles, self.indices);
        mesh
    }
}
