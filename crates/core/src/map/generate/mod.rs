mod bitmask;
mod noise;
mod smooth;
mod threshold;
mod variant;

pub use self::{
    bitmask::BitmaskGenerator, noise::NoiseGenerator, smooth::Smoother,
    threshold::Thresholder,
    variant::{MissingVariantError, VariantResolver},
};

use crate::{map::TerrainMap, timed, MapConfig};
use anyhow::Context;
use log::{debug, info};
use rand::Rng;
use std::fmt::Debug;

/// Runs the full generation pipeline for a single map. Each stage takes the
/// output of the previous one and builds a brand new grid from it, so no
/// stage ever mutates data that another stage can see. The order is:
///
/// 1. [NoiseGenerator] - random values
/// 2. [Smoother] - clump the values into blobs
/// 3. [Thresholder] - split the blobs into land and water
/// 4. [BitmaskGenerator] - record which neighbors of each tile are land
/// 5. [VariantResolver] - pick artwork for each tile
pub struct MapBuilder<'a, R: Rng> {
    /// Assumed to be valid already. See [TerrainMap::generate].
    config: MapConfig,
    /// All randomness comes from here. Only the noise stage uses it.
    rng: &'a mut R,
}

impl<'a, R: Rng> MapBuilder<'a, R> {
    pub fn new(config: MapConfig, rng: &'a mut R) -> Self {
        Self { config, rng }
    }

    /// Run every stage in order and assemble the output.
    pub fn generate_map(self) -> anyhow::Result<TerrainMap> {
        let Self { config, rng } = self;
        let dimensions = config.dimensions()?;
        info!("Generating {} map", dimensions);

        let noise = apply_stage(
            NoiseGenerator {
                dimensions,
                min: config.noise.min,
                max: config.noise.max,
            },
            rng,
        )?;
        let smoothed = apply_stage(
            Smoother {
                iterations: config.smoothing_iterations,
            },
            noise,
        )?;
        let terrain = apply_stage(
            Thresholder {
                offset: config.sea_level_offset,
            },
            smoothed,
        )?;
        let bitmasks = apply_stage(BitmaskGenerator, &terrain)?;
        let variants = apply_stage(VariantResolver, (&terrain, &bitmasks))?;

        let map = TerrainMap {
            config,
            terrain,
            bitmasks,
            variants,
        };
        debug!(
            "Map has {} land tiles out of {}",
            map.land_count(),
            dimensions.area()
        );
        Ok(map)
    }
}

/// A single step in the generation pipeline. `I` is whatever the stage needs
/// as input, usually the grid produced by the stage before it. Stages hold
/// their own parameters, and `Debug` is used to label them in logs.
///
/// Any error returned here indicates invalid parameters or a bug in the
/// pipeline. Stages never fail because of the random data they're given.
pub trait Stage<I>: Debug {
    type Output;

    fn run(&self, input: I) -> anyhow::Result<Self::Output>;
}

/// Run a stage, logging how long it took and tagging any error with the
/// stage that caused it
fn apply_stage<I, S: Stage<I>>(
    stage: S,
    input: I,
) -> anyhow::Result<S::Output> {
    timed!(format!("{:?}", stage), stage.run(input))
        .with_context(|| format!("error in {:?}", stage))
}
