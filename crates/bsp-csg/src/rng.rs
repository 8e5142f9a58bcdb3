//! Seeded, reproducible sequence generator used to shuffle polygons before
//! tree construction.
//!
//! Shuffling avoids pathological input orderings (for example a mesh whose
//! faces are emitted sweeping along one axis). Statistical quality does not
//! matter here; reproducibility does: the same input list always yields the
//! same tree shape, and therefore the same split counts.

use rand::RngCore;

const MODULUS: u32 = 233_280;
const MULTIPLIER: u32 = 9_301;
const INCREMENT: u32 = 49_297;

/// Linear congruential generator with a fixed default seed.
///
/// Implements [`RngCore`] so it can drive `rand`'s slice shuffling, and so
/// any other `RngCore` can be substituted when building a tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeterministicRng {
    state: u32,
}

impl DeterministicRng {
    /// Creates a generator starting from the default seed (0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator starting from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            state: seed % MODULUS,
        }
    }

    /// Advances the generator and returns the raw value in `0..233_280`.
    pub fn next_raw(&mut self) -> u32 {
        let next = (u64::from(self.state) * u64::from(MULTIPLIER) + u64::from(INCREMENT))
            % u64::from(MODULUS);
        self.state = next as u32;
        self.state
    }
}

impl RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        // Spread the raw range over the full u32 range; `rand`'s uniform
        // sampling reads the high bits.
        ((u64::from(self.next_raw()) << 32) / u64::from(MODULUS)) as u32
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    #[test]
    fn raw_sequence_matches_lcg() {
        let mut rng = DeterministicRng::new();
        assert_eq!(rng.next_raw(), 49_297);
        assert_eq!(rng.next_raw(), (49_297 * 9_301 + 49_297) % 233_280);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = DeterministicRng::with_seed(42);
        let mut b = DeterministicRng::with_seed(42);
        let xs: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn shuffle_is_reproducible_permutation() {
        let mut first: Vec<u32> = (0..50).collect();
        let mut second = first.clone();
        first.shuffle(&mut DeterministicRng::new());
        second.shuffle(&mut DeterministicRng::new());
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(first, sorted);
    }

    #[test]
    fn fill_bytes_handles_partial_chunks() {
        let mut rng = DeterministicRng::new();
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }
}
