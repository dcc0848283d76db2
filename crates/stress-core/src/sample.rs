//! Distinct random sampling from an integer range.

use rand::seq::SliceRandom;
use rand::Rng;

/// Draw up to `quantity` distinct integers from `[min, max]` (inclusive).
///
/// Builds the full range, shuffles it and keeps a prefix, so the result never
/// holds duplicates. If `quantity` exceeds the range length the whole shuffled
/// range comes back. An inverted range (`min > max`) yields nothing.
pub fn random_sample<R>(min: i64, max: i64, quantity: usize, rng: &mut R) -> Vec<i64>
where
    R: Rng + ?Sized,
{
    let mut numbers: Vec<i64> = (min..=max).collect();
    numbers.shuffle(rng);
    numbers.truncate(quantity);
    numbers
}
