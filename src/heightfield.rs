use noise::{NoiseFn, OpenSimplex};
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::error::MeshError;

/// Octave noise settings for [`Heightfield::from_simplex`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    pub frequency: f32,
    /// Each octave is divided by one more power of this
    pub scale: f32,
    pub octaves: u32,
    pub seed: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            frequency: 4.0,
            scale: 5.0,
            octaves: 4,
            seed: 0,
        }
    }
}

/// Diamond-square settings for [`Heightfield::from_midpoint_displacement`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MidpointParams {
    /// The grid is `2^magnitude + 1` points wide
    pub magnitude: u32,
    /// Roughness, strictly between 0 and 1; smaller values give rougher land
    pub fractal: f32,
    pub height_factor: f32,
    pub scale: f32,
}

impl Default for MidpointParams {
    fn default() -> Self {
        Self {
            magnitude: 7,
            fractal: 0.8,
            height_factor: 0.5,
            scale: 0.01,
        }
    }
}

/// A grid of heights, stored row-major as `x * zsize + z`
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    pub xsize: u32,
    pub zsize: u32,
    pub heights: Vec<f32>,
}

impl Heightfield {
    pub fn flat(xsize: u32, zsize: u32) -> Result<Self, MeshError> {
        crate::shapes::require("heightfield", "rows", 2, xsize)?;
        crate::shapes::require("heightfield", "columns", 2, zsize)?;
        let len = crate::shapes::vertex_total("heightfield", xsize.checked_mul(zsize))?;
        Ok(Self {
            xsize,
            zsize,
            heights: vec![0.0; len as usize],
        })
    }

    /// Sum `octaves` layers of OpenSimplex noise over the unit square; each layer doubles the
    /// frequency and is divided by the next power of `scale`. Heights land around 0.5.
    pub fn from_simplex(xsize: u32, zsize: u32, params: &NoiseParams) -> Result<Self, MeshError> {
        let mut field = Self::flat(xsize, zsize)?;
        let generator = OpenSimplex::new(params.seed);
        let x_factor = 1.0 / f64::from(xsize - 1);
        let z_factor = 1.0 / f64::from(zsize - 1);

        field
            .heights
            .par_chunks_mut(zsize as usize)
            .enumerate()
            .for_each(|(x, row)| {
                for (z, height) in row.iter_mut().enumerate() {
                    let point = [x as f64 * x_factor, z as f64 * z_factor];
                    let mut sum = 0.0;
                    let mut frequency = f64::from(params.frequency);
                    let mut divisor = f64::from(params.scale);
                    for _ in 0..params.octaves {
                        sum += generator.get([point[0] * frequency, point[1] * frequency]) / divisor;
                        frequency *= 2.0;
                        divisor *= f64::from(params.scale);
                    }
                    *height = ((sum + 1.0) / 2.0) as f32;
                }
            });

        Ok(field)
    }

    /// Fractal landscape by random midpoint displacement (diamond-square) with Gaussian
    /// offsets. The four corners start at zero.
    pub fn from_midpoint_displacement(
        params: &MidpointParams,
        rng: &mut impl Rng,
    ) -> Result<Self, MeshError> {
        crate::shapes::require("landscape", "magnitude", 1, params.magnitude)?;
        if !(params.fractal > 0.0 && params.fractal < 1.0) {
            return Err(MeshError::FractalOutOfRange(params.fractal));
        }

        let side = 1u32.checked_shl(params.magnitude).and_then(|side| side.checked_add(1));
        let size = crate::shapes::vertex_total("landscape", side)?;
        let max = size - 1;
        let mut field = Self::flat(size, size)?;

        let scale_factor = 2f32.powf(-params.fractal / 2.0);
        let roughness = (1.0 - 2f32.powf(2.0 * params.fractal - 2.0)).sqrt();
        let mut scale = params.height_factor * max as f32 * scale_factor * roughness * params.scale;
        let mut displace = |scale: f32| scale * rng.sample::<f32, _>(StandardNormal);

        let mut step = max;
        while step > 1 {
            let half = step / 2;

            // diamond: the centre of each square
            scale *= scale_factor;
            for x in (half..max).step_by(step as usize) {
                for z in (half..max).step_by(step as usize) {
                    let average = (field.get(x - half, z - half)
                        + field.get(x - half, z + half)
                        + field.get(x + half, z - half)
                        + field.get(x + half, z + half))
                        / 4.0;
                    field.set(x, z, average + displace(scale));
                }
            }

            // square: the edge midpoints, averaging whichever neighbours exist
            scale *= scale_factor;
            for x in (0..=max).step_by(half as usize) {
                let offset = if (x / half) % 2 == 0 { half } else { 0 };
                for z in (offset..=max).step_by(step as usize) {
                    let neighbours = [
                        x.checked_sub(half).map(|nx| (nx, z)),
                        (x + half <= max).then_some((x + half, z)),
                        z.checked_sub(half).map(|nz| (x, nz)),
                        (z + half <= max).then_some((x, z + half)),
                    ];
                    let (sum, count) = neighbours
                        .iter()
                        .flatten()
                        .fold((0.0, 0.0), |(sum, count), &(nx, nz)| {
                            (sum + field.get(nx, nz), count + 1.0)
                        });
                    field.set(x, z, sum / count + displace(scale));
                }
            }

            step = half;
        }

        Ok(field)
    }

    pub fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[(x * self.zsize + z) as usize]
    }

    pub fn set(&mut self, x: u32, z: u32, height: f32) {
        self.heights[(x * self.zsize + z) as usize] = height;
    }

    /// Rescale into `[0, 1]`; a flat field becomes all zeros
    pub fn normalize(&mut self) {
        let (min, max) = self
            .heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });
        let range = max - min;
        for height in &mut self.heights {
            *height = if range > 0.0 { (*height - min) / range } else { 0.0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn simplex_heights_stay_near_the_middle() {
        let field = Heightfield::from_simplex(33, 17, &NoiseParams::default()).unwrap();
        assert_eq!(field.heights.len(), 33 * 17);
        // the first octave is divided by 5, so the sum cannot stray far from zero
        assert!(field.heights.iter().all(|h| (0.25..=0.75).contains(h)));
        assert!(field.heights.iter().any(|&h| (h - 0.5).abs() > 1e-4));
    }

    #[test]
    fn simplex_is_deterministic_per_seed() {
        let params = NoiseParams::default();
        let a = Heightfield::from_simplex(16, 16, &params).unwrap();
        let b = Heightfield::from_simplex(16, 16, &params).unwrap();
        assert_eq!(a, b);

        let c = Heightfield::from_simplex(16, 16, &NoiseParams { seed: 9, ..params }).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn simplex_rejects_single_row() {
        assert!(Heightfield::from_simplex(1, 8, &NoiseParams::default()).is_err());
    }

    #[test]
    fn midpoint_fills_every_point() {
        let params = MidpointParams {
            magnitude: 4,
            ..MidpointParams::default()
        };
        let field =
            Heightfield::from_midpoint_displacement(&params, &mut StdRng::seed_from_u64(3))
                .unwrap();
        assert_eq!(field.xsize, 17);
        assert_eq!(field.zsize, 17);
        assert_eq!(field.get(0, 0), 0.0);
        assert_eq!(field.get(16, 16), 0.0);
        let interior_untouched = (1..16)
            .flat_map(|x| (1..16).map(move |z| (x, z)))
            .filter(|&(x, z)| field.get(x, z) == 0.0)
            .count();
        assert_eq!(interior_untouched, 0);
    }

    #[test]
    fn midpoint_follows_the_scale_schedule() {
        let params = MidpointParams {
            magnitude: 1,
            fractal: 0.6,
            height_factor: 0.5,
            scale: 1.0,
        };
        let field =
            Heightfield::from_midpoint_displacement(&params, &mut StdRng::seed_from_u64(11))
                .unwrap();

        let mut replay = StdRng::seed_from_u64(11);
        let draws: Vec<f32> = (0..5).map(|_| replay.sample(StandardNormal)).collect();
        let scale_factor = 2f32.powf(-0.3);
        let roughness = (1.0 - 2f32.powf(2.0 * 0.6 - 2.0)).sqrt();
        let initial = 0.5 * 2.0 * scale_factor * roughness * 1.0;
        let diamond = initial * scale_factor;
        let square = diamond * scale_factor;

        let centre = diamond * draws[0];
        assert_relative_eq!(field.get(1, 1), centre);
        // edge midpoints average the centre with two zero corners, in scan order
        let edges = [(0, 1), (1, 0), (1, 2), (2, 1)];
        for (&(x, z), draw) in edges.iter().zip(&draws[1..]) {
            assert_relative_eq!(field.get(x, z), centre / 3.0 + square * draw);
        }
        for (x, z) in [(0, 0), (0, 2), (2, 0), (2, 2)] {
            assert_eq!(field.get(x, z), 0.0);
        }
    }

    #[test]
    fn oversized_grids_are_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        for magnitude in [16, 31, 32, 40] {
            let params = MidpointParams {
                magnitude,
                ..MidpointParams::default()
            };
            assert!(matches!(
                Heightfield::from_midpoint_displacement(&params, &mut rng),
                Err(MeshError::TooManyVertices { .. })
            ));
        }
        assert!(matches!(
            Heightfield::from_simplex(70_000, 70_000, &NoiseParams::default()),
            Err(MeshError::TooManyVertices { shape: "heightfield" })
        ));
    }

    #[test]
    fn midpoint_rejects_bad_fractal() {
        let mut rng = StdRng::seed_from_u64(1);
        for fractal in [0.0, 1.0, 1.5] {
            let params = MidpointParams {
                fractal,
                ..MidpointParams::default()
            };
            assert!(matches!(
                Heightfield::from_midpoint_displacement(&params, &mut rng),
                Err(MeshError::FractalOutOfRange(_))
            ));
        }
    }

    #[test]
    fn normalize_spans_unit_range() {
        let mut field = Heightfield::flat(2, 2).unwrap();
        field.heights = vec![-2.0, 0.0, 2.0, 1.0];
        field.normalize();
        assert_eq!(field.heights, vec![0.0, 0.5, 1.0, 0.75]);

        let mut flat = Heightfield::flat(3, 3).unwrap();
        flat.heights.fill(4.0);
        flat.normalize();
        assert!(flat.heights.iter().all(|&h| h == 0.0));
        assert_relative_eq!(flat.heights.iter().sum::<f32>(), 0.0);
    }
}
