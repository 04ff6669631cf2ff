//! Random index sampling for collection resets.

use rand::Rng;

/// Draw `count` indices from `[1, max_index]`, sorted ascending.
///
/// Sampling is with replacement: duplicates are allowed and callers must not
/// assume distinct values. Ascending order is required for deterministic
/// downstream indexing. An empty result is returned when either argument is
/// zero.
pub fn pick_indices(count: usize, max_index: u32) -> Vec<u32> {
    if count == 0 || max_index == 0 {
        return Vec::new();
    }

    let mut rng = rand::rng();
    let mut indices: Vec<u32> = (0..count)
        .map(|_| rng.random_range(1..=max_index))
        .collect();
    indices.sort_unstable();
    indices
}
