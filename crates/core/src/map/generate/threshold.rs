use crate::map::{generate::Stage, grid::Grid, tile::Terrain};
use log::debug;

/// Splits a smoothed grid into land and water using one cutoff for the whole
/// map: the (floored) average value plus an offset. Tiles **at or below** the
/// cutoff are water, so a perfectly flat grid is all water.
#[derive(Copy, Clone, Debug)]
pub struct Thresholder {
    /// Added to the average to get the cutoff. Higher means less land.
    pub offset: i32,
}

impl Thresholder {
    /// Calculate the land/water cutoff for a grid
    pub fn cutoff(&self, grid: &Grid<i32>) -> i64 {
        let sum: i64 = grid.values().map(|&value| i64::from(value)).sum();
        let mean = sum.div_euclid(grid.dimensions().area() as i64);
        mean + i64::from(self.offset)
    }

    pub fn threshold(&self, grid: &Grid<i32>) -> Grid<Terrain> {
        let cutoff = self.cutoff(grid);
        debug!("Land/water cutoff is {}", cutoff);
        grid.map(|_, &value| {
            if i64::from(value) <= cutoff {
                Terrain::Water
            } else {
                Terrain::Land
            }
        })
    }
}

impl Stage<Grid<i32>> for Thresholder {
    type Output = Grid<Terrain>;

    fn run(&self, grid: Grid<i32>) -> anyhow::Result<Self::Output> {
        Ok(self.threshold(&grid))
    }
}
