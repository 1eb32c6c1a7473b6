use crate::map::{
    generate::Stage,
    grid::{Grid, TilePoint},
};

/// Repeatedly blurs a grid so that high and low values clump together into
/// blobs. Each pass sets every tile to the average of its neighbors from the
/// previous pass. The tile's own value is not part of the average, and edge
/// tiles only average the neighbors they actually have.
#[derive(Copy, Clone, Debug)]
pub struct Smoother {
    /// Number of passes. Zero passes returns the grid untouched.
    pub iterations: u32,
}

impl Smoother {
    pub fn smooth(&self, grid: Grid<i32>) -> Grid<i32> {
        (0..self.iterations).fold(grid, |grid, _| smooth_once(&grid))
    }
}

impl Stage<Grid<i32>> for Smoother {
    type Output = Grid<i32>;

    fn run(&self, grid: Grid<i32>) -> anyhow::Result<Self::Output> {
        Ok(self.smooth(grid))
    }
}

/// Run a single pass. Reads only from `grid` and writes to a new grid, so
/// updated values never feed into their neighbors within the same pass.
fn smooth_once(grid: &Grid<i32>) -> Grid<i32> {
    grid.map(|point, &value| neighbor_average(grid, point).unwrap_or(value))
}

/// Truncated integer mean of all in-bounds neighbors. `None` if there are no
/// neighbors, which only happens on a 1x1 grid.
fn neighbor_average(grid: &Grid<i32>, point: TilePoint) -> Option<i32> {
    let (sum, count) = grid
        .neighbors(point)
        .fold((0i64, 0i64), |(sum, count), (_, &value)| {
            (sum + i64::from(value), count + 1)
        });
    if count == 0 {
        None
    } else {
        // Fits, since a mean is always within the range of its inputs
        Some((sum / count) as i32)
    }
}
