//! Seeded train/test splitting.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{SfiError, SfiResult};

/// Row indices assigned to each side of the split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with `seed` and hold out `ceil(n * test_fraction)` rows
///
/// Both sides must end up non-empty.
pub fn train_test_split(n_samples: usize, test_fraction: f64, seed: u64) -> SfiResult<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SfiError::InvalidConfig(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (n_samples as f64 * test_fraction).ceil() as usize;
    if n_samples < 2 || n_test >= n_samples {
        return Err(SfiError::InsufficientData {
            needed: 2,
            found: n_samples,
        });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit { train, test: indices })
}
