use crate::map::{
    bitmask::Bitmask,
    generate::Stage,
    grid::{Grid, TilePoint},
    tile::Terrain,
};

/// Calculates a [Bitmask] for every tile, recording which of its neighbors
/// are land. Out-of-bounds neighbors count as not land. Masks are calculated
/// for water tiles too, but only land tiles ever look theirs up.
#[derive(Copy, Clone, Debug)]
pub struct BitmaskGenerator;

impl BitmaskGenerator {
    /// The uncorrected mask for one tile, with a bit set for every land
    /// neighbor (including lone corners)
    pub fn raw_bitmask(terrain: &Grid<Terrain>, point: TilePoint) -> Bitmask {
        Bitmask::from_neighbors(
            terrain
                .neighbors(point)
                .filter(|(_, terrain)| terrain.is_land())
                .map(|(neighbor, _)| neighbor),
        )
    }

    /// Calculate the corrected mask for every tile on the map
    pub fn generate(&self, terrain: &Grid<Terrain>) -> Grid<Bitmask> {
        terrain.map(|point, _| {
            Self::raw_bitmask(terrain, point).without_redundant_corners()
        })
    }
}

impl<'a> Stage<&'a Grid<Terrain>> for BitmaskGenerator {
    type Output = Grid<Bitmask>;

    fn run(&self, terrain: &'a Grid<Terrain>) -> anyhow::Result<Self::Output> {
        Ok(self.generate(terrain))
    }
}
