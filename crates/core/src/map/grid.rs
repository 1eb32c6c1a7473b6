//! Basic types and data structures for rectangular tile grids.

use anyhow::{anyhow, ensure};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum::{EnumIter, IntoEnumIterator};

/// Largest number of rows or columns a map can have. Every tile in bounds
/// must have coordinates that fit in an `i32`.
const MAX_SIDE: usize = i32::MAX as usize;

/// The size of a map, in tiles. Both components are always positive, which is
/// enforced by [Dimensions::new]. Once a map is generated, its dimensions can
/// never change.
#[derive(
    Copy, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[display(fmt = "{}x{}", cols, rows)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    cols: usize,
    rows: usize,
}

impl Dimensions {
    /// Create a new set of dimensions. Returns an error if either component is
    /// zero, or too big to be addressed by a [TilePoint].
    pub fn new(cols: usize, rows: usize) -> anyhow::Result<Self> {
        ensure!(
            cols > 0 && rows > 0,
            "map dimensions must be positive, but got {}x{}",
            cols,
            rows
        );
        ensure!(
            cols <= MAX_SIDE && rows <= MAX_SIDE,
            "map dimensions can be at most {} on each side, but got {}x{}",
            MAX_SIDE,
            cols,
            rows
        );
        Ok(Self { cols, rows })
    }

    /// Number of columns, i.e. the width of the map in tiles
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows, i.e. the height of the map in tiles
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of tiles in a map of this size
    pub fn area(&self) -> usize {
        self.cols * self.rows
    }

    /// Is the given point inside a map of this size?
    pub fn contains(&self, point: TilePoint) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.cols
            && (point.y as usize) < self.rows
    }

    /// Iterate over every point in a map of this size, in row-major order
    /// (row 0 first, left to right within each row).
    pub fn points(self) -> impl Iterator<Item = TilePoint> {
        (0..self.rows).flat_map(move |y| {
            (0..self.cols).map(move |x| TilePoint::new(x as i32, y as i32))
        })
    }
}

/// Unchecked mirror of [Dimensions], so that deserialization goes through the
/// same validation as [Dimensions::new].
#[derive(Deserialize)]
#[serde(rename = "Dimensions")]
struct RawDimensions {
    cols: usize,
    rows: usize,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = anyhow::Error;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.cols, raw.rows)
    }
}

/// A position on a tile grid. `x` is the column and `y` is the row. The y axis
/// points **up**: row 0 is the bottom of the map, which is how the tile layer
/// consuming this data is laid out. So the "top" neighbor of a tile is at
/// `y + 1`.
///
/// Coordinates are signed so that neighbor offsets can step off the edge of
/// the map. Use [Dimensions::contains] to check a point before indexing.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the point one step away in the given direction. The result may be
    /// out of bounds for the map.
    pub fn neighbor(self, direction: Neighbor) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Iterate over all 8 Moore neighbors of this point, including ones that
    /// are out of bounds. The order is the order of [Neighbor].
    pub fn neighbors(self) -> impl Iterator<Item = (Neighbor, TilePoint)> {
        Neighbor::iter().map(move |dir| (dir, self.neighbor(dir)))
    }
}

/// The 8 positions surrounding a tile. The declaration order is the scan
/// order used everywhere neighbors are visited: top row left-to-right, then
/// left and right, then bottom row left-to-right.
#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum Neighbor {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Neighbor {
    /// Get the (x, y) offset that moves a point one tile in this direction.
    /// Remember that y points up.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::TopLeft => (-1, 1),
            Self::Top => (0, 1),
            Self::TopRight => (1, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::BottomLeft => (-1, -1),
            Self::Bottom => (0, -1),
            Self::BottomRight => (1, -1),
        }
    }

    /// Is this a corner (diagonal) neighbor?
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

/// A dense rectangular grid of values, one per tile, stored in row-major
/// order. Every stage of map generation produces one of these, and all the
/// grids that belong to a single map share the same [Dimensions].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Grid<T> {
    dimensions: Dimensions,
    tiles: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid by calling a function for each point. The function is
    /// called in row-major order, which matters for anything stateful (e.g.
    /// drawing from an RNG).
    pub fn from_fn(
        dimensions: Dimensions,
        mut f: impl FnMut(TilePoint) -> T,
    ) -> Self {
        let tiles = dimensions.points().map(|point| f(point)).collect();
        Self { dimensions, tiles }
    }

    /// Build a grid from row-major values. The length of the vec must match
    /// the dimensions.
    pub fn from_vec(
        dimensions: Dimensions,
        tiles: Vec<T>,
    ) -> anyhow::Result<Self> {
        ensure!(
            tiles.len() == dimensions.area(),
            "expected {} tiles for a {} grid, but got {}",
            dimensions.area(),
            dimensions,
            tiles.len()
        );
        Ok(Self { dimensions, tiles })
    }

    /// Build a grid from a list of rows, listed **bottom row first**. Every
    /// row must be the same non-zero length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> anyhow::Result<Self> {
        let num_cols = rows.first().map(Vec::len).unwrap_or(0);
        let dimensions = Dimensions::new(num_cols, rows.len())?;
        ensure!(
            rows.iter().all(|row| row.len() == num_cols),
            "all rows must have {} columns",
            num_cols
        );
        Self::from_vec(dimensions, rows.into_iter().flatten().collect())
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Get the value at a point, or `None` if the point is out of bounds
    pub fn get(&self, point: TilePoint) -> Option<&T> {
        self.index(point).map(|i| &self.tiles[i])
    }

    /// Iterate over every point and its value, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (TilePoint, &T)> {
        self.dimensions.points().zip(self.tiles.iter())
    }

    /// Iterate over just the values, in row-major order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.tiles.iter()
    }

    /// Iterate over the values of every in-bounds Moore neighbor of a point.
    /// Tiles on the edge of the map have 5 neighbors, corners have 3, and a
    /// 1x1 grid has none at all.
    pub fn neighbors(
        &self,
        point: TilePoint,
    ) -> impl Iterator<Item = (Neighbor, &T)> {
        point
            .neighbors()
            .filter_map(move |(dir, pos)| self.get(pos).map(|v| (dir, v)))
    }

    /// Create a new grid of the same size by transforming every value
    pub fn map<U>(&self, mut f: impl FnMut(TilePoint, &T) -> U) -> Grid<U> {
        Grid {
            dimensions: self.dimensions,
            tiles: self.iter().map(|(point, value)| f(point, value)).collect(),
        }
    }

    fn index(&self, point: TilePoint) -> Option<usize> {
        if self.dimensions.contains(point) {
            Some(point.y as usize * self.dimensions.cols + point.x as usize)
        } else {
            None
        }
    }
}

/// Unchecked mirror of [Grid] used during deserialization
#[derive(Deserialize)]
#[serde(rename = "Grid")]
struct RawGrid<T> {
    dimensions: Dimensions,
    tiles: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = anyhow::Error;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        Self::from_vec(raw.dimensions, raw.tiles)
            .map_err(|err| anyhow!("invalid grid: {}", err))
    }
}
