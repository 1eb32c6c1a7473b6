use crate::map::{
    bitmask::Bitmask,
    generate::Stage,
    grid::{Grid, TilePoint},
    tile::{LandVariant, Terrain, TileVariant},
};
use anyhow::ensure;
use derive_more::Display;

/// A land tile ended up with a bitmask that has no artwork. The bitmask stage
/// only ever produces masks that are in the variant table, so this is always
/// a bug in the generator, never a problem with the config. Generation aborts
/// when it happens; don't retry with the same input.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display(
    fmt = "internal error: no land variant for bitmask {} at {}",
    bitmask,
    point
)]
pub struct MissingVariantError {
    pub bitmask: Bitmask,
    pub point: TilePoint,
}

impl std::error::Error for MissingVariantError {}

/// Picks the artwork for every tile. Water tiles all get
/// [TileVariant::Water], land tiles look their bitmask up in the variant
/// table.
#[derive(Copy, Clone, Debug)]
pub struct VariantResolver;

impl VariantResolver {
    /// Resolve variants for a whole map. Returns an error if the grids are
    /// different sizes, or a [MissingVariantError] if a land tile has a
    /// bitmask that isn't in the table. Either one means there's a bug
    /// upstream.
    pub fn resolve(
        &self,
        terrain: &Grid<Terrain>,
        bitmasks: &Grid<Bitmask>,
    ) -> anyhow::Result<Grid<TileVariant>> {
        ensure!(
            terrain.dimensions() == bitmasks.dimensions(),
            "terrain is {} but bitmasks are {}",
            terrain.dimensions(),
            bitmasks.dimensions()
        );

        let variants = terrain
            .iter()
            .zip(bitmasks.values())
            .map(|((point, terrain), &bitmask)| match terrain {
                Terrain::Water => Ok(TileVariant::Water),
                Terrain::Land => LandVariant::from_bitmask(bitmask)
                    .map(TileVariant::Land)
                    .ok_or(MissingVariantError { bitmask, point }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Grid::from_vec(terrain.dimensions(), variants)
    }
}

impl<'a> Stage<(&'a Grid<Terrain>, &'a Grid<Bitmask>)> for VariantResolver {
    type Output = Grid<TileVariant>;

    fn run(
        &self,
        (terrain, bitmasks): (&'a Grid<Terrain>, &'a Grid<Bitmask>),
    ) -> anyhow::Result<Self::Output> {
        self.resolve(terrain, bitmasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::generate::BitmaskGenerator;
    use crate::map::tile::Terrain::{Land as L, Water as W};

    #[test]
    fn test_resolve() {
        let terrain = Grid::from_rows(vec![
            vec![W, L, L],
            vec![W, L, L],
            vec![W, W, W],
        ])
        .unwrap();
        let bitmasks = BitmaskGenerator.generate(&terrain);
        let variants = VariantResolver.resolve(&terrain, &bitmasks).unwrap();

        assert_eq!(variants.get(TilePoint::new(0, 0)), Some(&TileVariant::Water));
        // (1,0) has land right, top and top-right: 16 + 2 + 4 = 22
        assert_eq!(
            variants.get(TilePoint::new(1, 0)),
            Some(&TileVariant::Land(LandVariant::from_bitmask(22.into()).unwrap()))
        );
        for (point, variant) in variants.iter() {
            assert_eq!(
                variant.terrain(),
                *terrain.get(point).unwrap(),
                "mismatch at {}",
                point
            );
        }
    }

    #[test]
    fn test_unknown_bitmask() {
        let terrain = Grid::from_rows(vec![vec![L, W]]).unwrap();
        // Lone corner bit that corner correction would have removed
        let bitmasks =
            Grid::from_rows(vec![vec![Bitmask::from(1), Bitmask::EMPTY]])
                .unwrap();
        let err = VariantResolver.resolve(&terrain, &bitmasks).unwrap_err();
        assert_eq!(
            err.to_string(),
            "internal error: no land variant for bitmask 1 at (0, 0)"
        );
        assert_eq!(
            err.downcast_ref::<MissingVariantError>(),
            Some(&MissingVariantError {
                bitmask: Bitmask::from(1),
                point: TilePoint::new(0, 0),
            })
        );
    }

    #[test]
    fn test_water_ignores_bitmask() {
        let terrain = Grid::from_rows(vec![vec![W]]).unwrap();
        let bitmasks = Grid::from_rows(vec![vec![Bitmask::from(1)]]).unwrap();
        let variants = VariantResolver.resolve(&terrain, &bitmasks).unwrap();
        assert_eq!(variants.get(TilePoint::new(0, 0)), Some(&TileVariant::Water));
    }

    #[test]
    fn test_mismatched_sizes() {
        let terrain = Grid::from_rows(vec![vec![W, W]]).unwrap();
        let bitmasks = Grid::from_rows(vec![vec![Bitmask::EMPTY]]).unwrap();
        assert!(VariantResolver.resolve(&terrain, &bitmasks).is_err());
    }
}
