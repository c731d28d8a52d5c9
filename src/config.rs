use std::{path::PathBuf, time::Duration};

use log::warn;

use crate::heightfield::{MidpointParams, NoiseParams};

/// Where the terrain heights come from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerrainSource {
    Simplex {
        xsize: u32,
        zsize: u32,
        noise: NoiseParams,
    },
    /// Random midpoint displacement, normalised into `[0, 1]`
    Mountains(MidpointParams),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fps: u32,
    pub sphere_resolution: (u32, u32),
    pub light_resolution: (u32, u32),
    pub planets: usize,
    pub terrain: TerrainSource,
    pub terrain_width: f32,
    pub terrain_depth: f32,
    /// `.obj` file to show on key 7; `-` reads it from standard input
    pub model: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Selected Model".to_string(),
            fps: 60,
            sphere_resolution: (40, 40),
            light_resolution: (20, 20),
            planets: 100,
            terrain: TerrainSource::Simplex {
                xsize: 100,
                zsize: 100,
                noise: NoiseParams::default(),
            },
            terrain_width: 2.0,
            terrain_depth: 2.0,
            model: None,
        }
    }
}

impl Config {
    /// Read the program arguments: an optional `.obj` path and `--mountains`. Anything else
    /// is logged and ignored.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut config = Self::default();
        for arg in args {
            match arg.as_str() {
                "--mountains" => {
                    config.terrain = TerrainSource::Mountains(MidpointParams::default());
                }
                flag if flag.starts_with("--") => warn!("ignoring unknown flag {flag}"),
                path if config.model.is_none() => config.model = Some(PathBuf::from(path)),
                extra => warn!("ignoring extra argument {extra}"),
            }
        }
        config
    }

    /// Animation step for `elapsed` wall time: seconds over the milliseconds a frame should take
    pub fn animation_delta(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() / (1000.0 / f64::from(self.fps.max(1)))
    }
}
