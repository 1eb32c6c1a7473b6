use crate::map::{
    generate::Stage,
    grid::{Dimensions, Grid},
};
use anyhow::ensure;
use rand::Rng;

/// Fills a grid with uniformly random integers in `[min, max]`. This is the
/// raw static that smoothing later clumps into islands.
#[derive(Copy, Clone, Debug)]
pub struct NoiseGenerator {
    pub dimensions: Dimensions,
    pub min: i32,
    pub max: i32,
}

impl NoiseGenerator {
    /// Draw a new noise grid. Values are drawn in row-major order, so the same
    /// RNG state always gives the same grid. Fails if `min > max`.
    pub fn generate(&self, rng: &mut impl Rng) -> anyhow::Result<Grid<i32>> {
        ensure!(
            self.min <= self.max,
            "noise min {} is greater than max {}",
            self.min,
            self.max
        );
        Ok(Grid::from_fn(self.dimensions, |_| {
            rng.gen_range(self.min..=self.max)
        }))
    }
}

impl<'a, R: Rng> Stage<&'a mut R> for NoiseGenerator {
    type Output = Grid<i32>;

    fn run(&self, rng: &'a mut R) -> anyhow::Result<Self::Output> {
        self.generate(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn generator(
        cols: usize,
        rows: usize,
        min: i32,
        max: i32,
    ) -> NoiseGenerator {
        NoiseGenerator {
            dimensions: Dimensions::new(cols, rows).unwrap(),
            min,
            max,
        }
    }

    #[test]
    fn test_values_in_range() {
        let mut rng = Pcg64::seed_from_u64(3);
        for &(min, max) in &[(1, 100), (-5, 5), (0, 0), (-20, -10)] {
            let grid = generator(17, 9, min, max).generate(&mut rng).unwrap();
            assert_eq!(grid.dimensions().area(), 17 * 9);
            for &value in grid.values() {
                assert!(
                    value >= min && value <= max,
                    "{} not in [{}, {}]",
                    value,
                    min,
                    max
                );
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let noise = generator(8, 8, 1, 100);
        let a = noise.generate(&mut Pcg64::seed_from_u64(99)).unwrap();
        let b = noise.generate(&mut Pcg64::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_range() {
        let err = generator(2, 2, 10, 1)
            .generate(&mut Pcg64::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err.to_string(), "noise min 10 is greater than max 1");
    }
}
