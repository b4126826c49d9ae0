//! Seeded train/test partitioning

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Share of rows held out for evaluation, in percent
pub const TEST_PERCENT: usize = 20;

/// Seed of the partition permutation
pub const SPLIT_SEED: u64 = 42;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of test rows for `n` rows: ceil(n * 20%)
pub fn test_size(n: usize) -> usize {
    (n * TEST_PERCENT).div_ceil(100)
}

/// Shuffle `0..n` with a fixed seed; the first `test_size(n)` indices form
/// the test partition, the remainder the train partition.
pub fn train_test_split(n: usize, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size(n));
    Split {
        train,
        test: indices,
    }
}
