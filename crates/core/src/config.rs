mod seed;

pub use seed::Seed;

use crate::map::Dimensions;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Configuration that defines a map generation run. Two maps generated with
/// the same config will always be identical.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MapConfig {
    /// RNG seed for noise generation. See [Seed] for the accepted formats.
    pub seed: Seed,

    /// Width of the map, in tiles
    #[validate(range(min = 1, max = 10000))]
    pub num_cols: u16,

    /// Height of the map, in tiles
    #[validate(range(min = 1, max = 10000))]
    pub num_rows: u16,

    /// Width of a single tile, in pixels. Nothing in generation uses this,
    /// it's carried along for whoever draws the map.
    #[validate(range(min = 1))]
    pub tile_width: u16,

    /// Height of a single tile, in pixels. See `tile_width`.
    #[validate(range(min = 1))]
    pub tile_height: u16,

    /// Number of smoothing passes applied to the raw noise. More passes means
    /// fewer, larger, rounder islands. At least one pass is required,
    /// otherwise the map is just static.
    #[validate(range(min = 1, max = 1000))]
    pub smoothing_iterations: u32,

    /// Shifts the land/water cutoff away from the average noise value. A
    /// positive offset raises the sea and gives less land, a negative one
    /// lowers it and gives more.
    pub sea_level_offset: i32,

    /// Range of the raw noise values
    #[validate]
    pub noise: NoiseConfig,
}

/// The range that raw noise values are drawn from, inclusive on both ends.
/// Only the spread relative to the sea level offset really matters, since the
/// cutoff is always relative to the average value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_noise_range"))]
pub struct NoiseConfig {
    pub min: i32,
    pub max: i32,
}

impl MapConfig {
    /// Get the size of the map in tiles. Fails if either component is zero.
    pub fn dimensions(&self) -> anyhow::Result<Dimensions> {
        Dimensions::new(self.num_cols.into(), self.num_rows.into())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Danger! This means the default will vary between calls!
            seed: Seed::random(),

            num_cols: 100,
            num_rows: 100,
            tile_width: 64,
            tile_height: 64,
            smoothing_iterations: 3,
            sea_level_offset: 0,
            noise: NoiseConfig::default(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

fn validate_noise_range(noise: &NoiseConfig) -> Result<(), ValidationError> {
    if noise.min <= noise.max {
        Ok(())
    } else {
        Err(ValidationError::new("noise_range"))
    }
}
