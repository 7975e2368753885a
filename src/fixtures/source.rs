//! Random source handle threaded through the fixture generators.

use crate::core::Result;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The draws the fixture generators need.
///
/// Implemented for every [`rand::Rng`]; tests may implement it directly to
/// script the sequence.
pub trait RandomSource {
    /// Uniform float in `low..=high`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `low..=high`.
    fn int_in(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `0..1`.
    fn unit(&mut self) -> f64;

    /// Index drawn with probability proportional to `weights`.
    fn weighted_index(&mut self, weights: &[f64]) -> Result<usize>;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..=high)
    }

    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn weighted_index(&mut self, weights: &[f64]) -> Result<usize> {
        let dist = WeightedIndex::new(weights)?;
        Ok(dist.sample(self))
    }
}

/// Pick one of `items` with probability proportional to `weights`.
pub fn choose_weighted<'a, T, S: RandomSource + ?Sized>(
    rng: &mut S,
    items: &'a [T],
    weights: &[f64],
) -> Result<&'a T> {
    let idx = rng.weighted_index(weights)?;
    Ok(&items[idx])
}

/// Pick one of `items` uniformly. `items` must not be empty.
pub fn choose<'a, T, S: RandomSource + ?Sized>(rng: &mut S, items: &'a [T]) -> &'a T {
    let idx = rng.int_in(0, items.len() as i64 - 1) as usize;
    &items[idx]
}

/// Deterministic generator for one run.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use crate::core::Error;

    /// Replays a fixed list of unit draws.
    pub struct ScriptedSource {
        draws: Vec<f64>,
        pos: usize,
    }

    impl ScriptedSource {
        pub fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec(),
                pos: 0,
            }
        }

        fn next(&mut self) -> f64 {
            let v = self.draws[self.pos % self.draws.len()];
            self.pos += 1;
            v
        }
    }

    impl RandomSource for ScriptedSource {
        fn uniform(&mut self, low: f64, high: f64) -> f64 {
            low + (high - low) * self.next()
        }

        fn int_in(&mut self, low: i64, high: i64) -> i64 {
            let span = (high - low + 1) as f64;
            (low + (span * self.next()) as i64).min(high)
        }

        fn unit(&mut self) -> f64 {
            self.next()
        }

        fn weighted_index(&mut self, weights: &[f64]) -> Result<usize> {
            let total: f64 = weights.iter().sum();
            if total <= 0.0 {
                return Err(Error::InvalidWeights("all weights zero".into()));
            }
            let mut target = self.next() * total;
            for (i, w) in weights.iter().enumerate() {
                if target < *w {
                    return Ok(i);
                }
                target -= w;
            }
            Ok(weights.len() - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for _ in 0..10 {
            assert_eq!(a.uniform(1.0, 2.0), b.uniform(1.0, 2.0));
            assert_eq!(a.int_in(1, 700), b.int_in(1, 700));
        }
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let mut rng = seeded(7);
        for _ in 0..200 {
            let v = rng.int_in(1, 3);
            assert!((1..=3).contains(&v));
            let f = rng.uniform(0.5, 0.5);
            assert_eq!(f, 0.5);
        }
    }

    #[test]
    fn test_weighted_choice() {
        let mut rng = seeded(1);
        let items = ["never", "always"];
        for _ in 0..50 {
            assert_eq!(*choose_weighted(&mut rng, &items, &[0.0, 1.0]).unwrap(), "always");
        }
        assert!(choose_weighted(&mut rng, &items, &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_scripted_source() {
        let mut source = scripted::ScriptedSource::new(&[0.0, 0.99]);
        assert_eq!(source.int_in(1, 10), 1);
        assert_eq!(source.int_in(1, 10), 10);
        assert_eq!(source.weighted_index(&[0.1, 0.9]).unwrap(), 0);
    }
}
