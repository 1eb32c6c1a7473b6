mod bitmask;
pub mod generate;
mod grid;
mod tile;

pub use self::{
    bitmask::Bitmask,
    grid::{Dimensions, Grid, Neighbor, TilePoint},
    tile::{LandVariant, Terrain, TileVariant},
};

use crate::{
    map::generate::{BitmaskGenerator, MapBuilder, VariantResolver},
    timed, MapConfig,
};
use anyhow::{bail, ensure, Context};
use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use validator::Validate;

/// A fully generated map. Holds the land/water layout, the neighbor bitmask of
/// every tile, the artwork variant chosen for every tile, and the config that
/// produced all of it. All three grids always have the same dimensions.
///
/// A map never changes after generation, so it can be freely shared between
/// whatever draws it and whatever checks movement against it.
///
/// ## Serialization
/// Maps can be exported as JSON ([TerrainMap::to_json], `json` feature) or
/// as binary ([TerrainMap::to_bin], `bin` feature). The binary format is
/// currently [CBOR](https://cbor.io/), but that's subject to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTerrainMap")]
pub struct TerrainMap {
    /// The config used to generate this map. Generation is deterministic
    /// based on config, so this is enough to rebuild the map.
    config: MapConfig,
    terrain: Grid<Terrain>,
    /// Calculated for every tile, but only meaningful for land
    bitmasks: Grid<Bitmask>,
    variants: Grid<TileVariant>,
}

impl TerrainMap {
    /// Generate a new map with the given config. The RNG is seeded from the
    /// config's seed. Returns an error if the config is invalid; the error
    /// can be downcast to [validator::ValidationErrors] in that case.
    pub fn generate(config: MapConfig) -> anyhow::Result<Self> {
        let mut rng = Pcg64::seed_from_u64(config.seed.to_u64());
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generate a new map, drawing all randomness from the given RNG instead
    /// of the config's seed. Useful for tests, or for callers that manage
    /// their own RNG. Each concurrent generation needs its own RNG.
    pub fn generate_with_rng(
        config: MapConfig,
        rng: &mut impl Rng,
    ) -> anyhow::Result<Self> {
        info!("Generating map with config {:#?}", config);
        config.validate().context("invalid config")?;

        timed!(
            "Map generation",
            log::Level::Info,
            MapBuilder::new(config, rng).generate_map()
        )
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn dimensions(&self) -> Dimensions {
        self.terrain.dimensions()
    }

    /// Width of one tile in pixels, for rendering
    pub fn tile_width(&self) -> u16 {
        self.config.tile_width
    }

    /// Height of one tile in pixels, for rendering
    pub fn tile_height(&self) -> u16 {
        self.config.tile_height
    }

    /// Land/water layout of the whole map
    pub fn terrain(&self) -> &Grid<Terrain> {
        &self.terrain
    }

    /// Neighbor bitmask of every tile. See [Bitmask].
    pub fn bitmasks(&self) -> &Grid<Bitmask> {
        &self.bitmasks
    }

    /// Artwork variant of every tile
    pub fn variants(&self) -> &Grid<TileVariant> {
        &self.variants
    }

    /// Get the terrain at a point. `None` if the point is off the map.
    pub fn terrain_at(&self, point: TilePoint) -> Option<Terrain> {
        self.terrain.get(point).copied()
    }

    pub fn bitmask_at(&self, point: TilePoint) -> Option<Bitmask> {
        self.bitmasks.get(point).copied()
    }

    pub fn variant_at(&self, point: TilePoint) -> Option<TileVariant> {
        self.variants.get(point).copied()
    }

    /// Can a ship sail onto this tile? Only water is traversable, and anything
    /// off the edge of the map is not.
    pub fn is_traversable(&self, point: TilePoint) -> bool {
        self.terrain_at(point).map_or(false, Terrain::is_water)
    }

    /// Number of land tiles on the map
    pub fn land_count(&self) -> usize {
        self.terrain.values().filter(|t| t.is_land()).count()
    }

    /// Get every spot where a village could go, according to the given
    /// placer
    pub fn village_locations(
        &self,
        placer: &impl VillagePlacer,
    ) -> Vec<VillageLocation> {
        placer.valid_locations(self)
    }

    /// Add villages to the map. Placing a village will eventually turn its
    /// dock tile into a special tile and re-resolve the variants around it,
    /// but that isn't supported yet. An empty list is accepted and does
    /// nothing, anything else is an error.
    pub fn add_villages(
        &mut self,
        locations: &[VillageLocation],
    ) -> anyhow::Result<()> {
        if locations.is_empty() {
            Ok(())
        } else {
            bail!(
                "cannot add {} village(s), village placement is not supported",
                locations.len()
            )
        }
    }

    /// Deserialize a map from JSON. A map can be serialized into JSON with
    /// [TerrainMap::to_json]. Will fail if the input is malformed.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("error deserializing map")
    }

    /// Serializes this map into JSON, which can be loaded back with
    /// [TerrainMap::from_json].
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        // Panic here indicates an internal bug in the data format
        serde_json::to_string(self).expect("error serializing map")
    }

    /// Deserialize a map from binary format. See the struct-level
    /// [TerrainMap] docs for a description of the format.
    #[cfg(feature = "bin")]
    pub fn from_bin(read: impl std::io::Read) -> anyhow::Result<Self> {
        serde_cbor::from_reader(read).context("error deserializing map")
    }

    /// Serializes this map into binary format, which can be loaded back with
    /// [TerrainMap::from_bin].
    #[cfg(feature = "bin")]
    pub fn to_bin(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Panic here indicates an internal bug in the data format
        serde_cbor::to_writer(&mut buffer, self).expect("error serializing map");
        buffer
    }

    /// Draw the map as text, one line per row with the top row first. Water
    /// is `~` and land is `#`. Handy for eyeballing a map in a terminal.
    pub fn to_ascii(&self) -> String {
        let dimensions = self.dimensions();
        let mut output =
            String::with_capacity((dimensions.cols() + 1) * dimensions.rows());
        for y in (0..dimensions.rows()).rev() {
            for x in 0..dimensions.cols() {
                let point = TilePoint::new(x as i32, y as i32);
                output.push(match self.terrain_at(point) {
                    Some(Terrain::Land) => '#',
                    _ => '~',
                });
            }
            output.push('\n');
        }
        output
    }
}

/// Unchecked mirror of [TerrainMap]. Deserialization goes through this so that
/// a map that generation couldn't have produced can never be loaded.
#[derive(Deserialize)]
#[serde(rename = "TerrainMap")]
struct RawTerrainMap {
    config: MapConfig,
    terrain: Grid<Terrain>,
    bitmasks: Grid<Bitmask>,
    variants: Grid<TileVariant>,
}

impl TryFrom<RawTerrainMap> for TerrainMap {
    type Error = anyhow::Error;

    fn try_from(raw: RawTerrainMap) -> Result<Self, Self::Error> {
        raw.config.validate().context("invalid config")?;
        let dimensions = raw.terrain.dimensions();
        ensure!(
            raw.config.dimensions()? == dimensions,
            "config dimensions don't match map dimensions {}",
            dimensions
        );

        // Bitmasks and variants are fully determined by the terrain, so
        // rebuild them and make sure the stored ones agree
        let bitmasks = BitmaskGenerator.generate(&raw.terrain);
        ensure!(
            raw.bitmasks == bitmasks,
            "bitmasks don't match the map's terrain"
        );
        let variants = VariantResolver.resolve(&raw.terrain, &bitmasks)?;
        ensure!(
            raw.variants == variants,
            "tile variants don't match the map's terrain"
        );

        Ok(Self {
            config: raw.config,
            terrain: raw.terrain,
            bitmasks,
            variants,
        })
    }
}

/// A spot on the map where a village could be founded. The dock is the water
/// tile ships use to reach the village.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageLocation {
    pub village_id: u32,
    pub dock: TilePoint,
}

/// Something that can pick village sites on a generated map. This is the hook
/// for village generation, which doesn't exist yet. See [NoVillages].
pub trait VillagePlacer {
    fn valid_locations(&self, map: &TerrainMap) -> Vec<VillageLocation>;
}

/// Placer that never finds anywhere to put a village
#[derive(Copy, Clone, Debug, Default)]
pub struct NoVillages;

impl VillagePlacer for NoVillages {
    fn valid_locations(&self, _map: &TerrainMap) -> Vec<VillageLocation> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::NoiseConfig, Seed};
    use serde_json::json;

    fn config(cols: u16, rows: u16, sea_level_offset: i32) -> MapConfig {
        MapConfig {
            seed: Seed::Int(8),
            num_cols: cols,
            num_rows: rows,
            tile_width: 32,
            tile_height: 16,
            smoothing_iterations: 3,
            sea_level_offset,
            noise: NoiseConfig { min: 1, max: 100 },
        }
    }

    #[test]
    fn test_accessors() {
        let map = TerrainMap::generate(config(6, 4, 0)).unwrap();
        assert_eq!(map.dimensions(), Dimensions::new(6, 4).unwrap());
        assert_eq!(map.tile_width(), 32);
        assert_eq!(map.tile_height(), 16);
        assert_eq!(map.terrain_at(TilePoint::new(6, 0)), None);
        assert!(!map.is_traversable(TilePoint::new(-1, 0)));

        for (point, &terrain) in map.terrain().iter() {
            assert_eq!(map.is_traversable(point), terrain.is_water());
            assert_eq!(map.variant_at(point).unwrap().terrain(), terrain);
        }
    }

    #[test]
    fn test_ascii() {
        let map = TerrainMap::generate(config(5, 3, -1000)).unwrap();
        assert_eq!(map.land_count(), 15);
        assert_eq!(map.to_ascii(), "#####\n#####\n#####\n");

        let map = TerrainMap::generate(config(2, 2, 1000)).unwrap();
        assert_eq!(map.land_count(), 0);
        assert_eq!(map.to_ascii(), "~~\n~~\n");
    }

    #[test]
    fn test_villages() {
        let mut map = TerrainMap::generate(config(4, 4, 0)).unwrap();
        assert!(map.village_locations(&NoVillages).is_empty());
        map.add_villages(&[]).unwrap();
        let location = VillageLocation {
            village_id: 1,
            dock: TilePoint::new(0, 0),
        };
        assert!(map.add_villages(&[location]).is_err());
    }

    /// Edits a serialized map and tries to load it back
    fn load_edited(
        edit: impl FnOnce(&mut serde_json::Value),
    ) -> anyhow::Result<TerrainMap> {
        let map = TerrainMap::generate(config(3, 1, -1000)).unwrap();
        let mut value = serde_json::to_value(&map).unwrap();
        edit(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    #[test]
    fn test_deserialize_unchanged() {
        let map = load_edited(|_| {}).unwrap();
        assert_eq!(map.land_count(), 3);
    }

    #[test]
    fn test_deserialize_inconsistent() {
        // Water tile that still carries its old land bitmask
        assert!(load_edited(|value| {
            value["terrain"]["tiles"][0] = json!("water");
            value["bitmasks"]["tiles"][0] = json!(1);
        })
        .is_err());
        // Terrain change without fixing the neighbors' bitmasks
        assert!(load_edited(|value| {
            value["terrain"]["tiles"][0] = json!("water");
            value["variants"]["tiles"][0] = json!("water");
        })
        .is_err());
        // Bitmask that no generated map could have
        assert!(load_edited(|value| {
            value["bitmasks"]["tiles"][1] = json!(1);
        })
        .is_err());
        // Water artwork on a land tile
        assert!(load_edited(|value| {
            value["variants"]["tiles"][2] = json!("water");
        })
        .is_err());
        // Config that generation would have rejected
        assert!(load_edited(|value| {
            value["config"]["smoothing_iterations"] = json!(0);
        })
        .is_err());
    }
}
