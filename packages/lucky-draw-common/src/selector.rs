use sha2::{Digest, Sha256};

use crate::error::DrawError;

/// Source of uniform indices for the shuffle.
pub trait RandomSource {
    /// Return an index uniformly distributed in `0..=max`.
    fn next_index(&mut self, max: usize) -> usize;
}

/// Deterministic generator built on SHA-256 in counter mode.
///
/// Block `n` is `sha256(seed || n_u64_be)`; the first 8 bytes of each block
/// are read as a big-endian u64. The same seed always yields the same
/// sequence, which keeps draws reproducible under test.
#[derive(Debug, Clone)]
pub struct HashRng {
    seed: [u8; 32],
    counter: u64,
}

impl HashRng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { seed, counter: 0 }
    }

    /// Derive a seed from several entropy parts.
    ///
    /// Each part is prefixed with its length so `["ab", "c"]` and
    /// `["a", "bc"]` hash differently.
    pub fn from_entropy(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        Self::from_seed(hasher.finalize().into())
    }

    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.counter = self.counter.wrapping_add(1);
        let block: [u8; 32] = hasher.finalize().into();

        let mut word = [0u8; 8];
        word.copy_from_slice(&block[0..8]);
        u64::from_be_bytes(word)
    }
}

impl RandomSource for HashRng {
    fn next_index(&mut self, max: usize) -> usize {
        let span = max as u64 + 1;
        // Largest multiple of `span` representable; values above it are
        // rejected so every index is equally likely.
        let limit = u64::MAX - (u64::MAX % span);
        loop {
            let value = self.next_u64();
            if value < limit {
                return (value % span) as usize;
            }
        }
    }
}

/// Fisher-Yates shuffle into a new vector. The input is left untouched.
pub fn shuffle<T: Clone, R: RandomSource + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.next_index(i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Sample `count` distinct elements without replacement, in random order.
pub fn draw_winners<T: Clone, R: RandomSource + ?Sized>(
    candidates: &[T],
    count: usize,
    rng: &mut R,
) -> Result<Vec<T>, DrawError> {
    if count > candidates.len() {
        return Err(DrawError::InvalidDrawSize {
            requested: count,
            available: candidates.len(),
        });
    }

    let mut shuffled = shuffle(candidates, rng);
    shuffled.truncate(count);
    Ok(shuffled)
}
