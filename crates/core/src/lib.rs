//! Isles is a tile-based island map generator. This crate contains all the
//! core generation logic: random noise is smoothed into blobs, split into land
//! and water, and then every land tile is assigned a piece of beach artwork
//! based on which of its neighbors are land (autotiling). Drawing the map and
//! moving things around on it are left to the caller.
//!
//! ```
//! use isles::{MapConfig, TerrainMap};
//!
//! let config = MapConfig::default();
//! let map = TerrainMap::generate(config).unwrap();
//! println!("{}", map.to_ascii());
//! // From here you can draw/use the map however you like.
//! ```
//!
//! See [MapConfig] for details on how generation can be customized.

mod config;
mod map;
mod util;

pub use crate::{
    config::{MapConfig, NoiseConfig, Seed},
    map::{
        generate, Bitmask, Dimensions, Grid, LandVariant, Neighbor,
        NoVillages, Terrain, TerrainMap, TilePoint, TileVariant,
        VillageLocation, VillagePlacer,
    },
};
