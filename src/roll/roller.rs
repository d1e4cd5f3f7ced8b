use crate::common::Int;
use num_bigint::RandBigInt;
use num_traits::One;
use rand::Rng;

/// A source of uniformly distributed die faces.
pub trait Roller {
    /// Draws one value from the inclusive range `low..=high`; callers guarantee `low <= high`.
    fn roll(&mut self, low: &Int, high: &Int) -> Int;

    fn roll_n(&mut self, num: usize, low: &Int, high: &Int) -> Vec<Int> {
        (0..num).map(|_| self.roll(low, high)).collect()
    }
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, low: &Int, high: &Int) -> Int {
        self.gen_bigint_range(low, &(high + Int::one()))
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;
    use num_integer::Integer;

    /// Yields `initial, initial + step, ...` wrapped into whatever range is requested.
    pub(crate) struct StepRoller {
        current: Int,
        step: Int,
    }

    impl StepRoller {
        pub fn new(initial: i64, step: i64) -> Self {
            Self {
                current: Int::from(initial),
                step: Int::from(step),
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, low: &Int, high: &Int) -> Int {
            let width = high - low + Int::one();
            let ret = low + (&self.current - Int::one()).mod_floor(&width);
            self.current += &self.step;
            ret
        }
    }

    #[test]
    fn test_step_roller_wraps() {
        let mut r = StepRoller::new(5, 1);
        let one = Int::one();
        let six = Int::from(6);
        let rolls = r.roll_n(4, &one, &six);
        assert_eq!(rolls, vec![5, 6, 1, 2].into_iter().map(Int::from).collect::<Vec<_>>());

        let mut r = StepRoller::new(1, 0);
        assert_eq!(r.roll(&Int::from(10), &Int::from(20)), Int::from(10));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_rng_roller_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let (low, high) = (Int::from(-3), Int::from(4));
        for x in rng.roll_n(1000, &low, &high) {
            assert!(low <= x && x <= high);
        }
    }

    #[test]
    fn test_rng_roller_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let six = Int::from(6);
        assert_eq!(rng.roll(&six, &six), six);
    }

    #[test]
    fn test_seeded_rollers_agree() {
        let (low, high) = (Int::from(1), Int::from(20));
        let a = StdRng::seed_from_u64(42).roll_n(10, &low, &high);
        let b = StdRng::seed_from_u64(42).roll_n(10, &low, &high);
        assert_eq!(a, b);
    }
}
