use rand::rngs::ThreadRng;
use rand::Rng;

/// Injected randomness for `Catalog::random`.
pub trait RandomSource {
    /// Returns an index in `0..upper`. Callers never pass `upper == 0`.
    fn pick_index(&mut self, upper: usize) -> usize;
}

/// `RandomSource` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    /// Uses the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomSource, RngSource};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seeded_source_stays_in_range() {
        let mut source = RngSource::new(StdRng::seed_from_u64(7));
        for _ in 0..100 {
            assert!(source.pick_index(3) < 3);
        }
        assert_eq!(source.pick_index(1), 0);
    }
}
