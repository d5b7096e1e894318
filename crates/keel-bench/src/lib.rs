//! Benchmark inputs for the keel workspace.
//!
//! - [`shuffled`]: deterministic permutation of `0..n` from a seed
//! - [`filled_array`]: array pre-populated from a slice

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use keel_alloc::Allocator;
use keel_array::{ArrayError, ArrayOptions, DynamicArray};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic permutation of `0..n`, seeded from `seed`.
pub fn shuffled(n: u32, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut values: Vec<u32> = (0..n).collect();
    values.shuffle(&mut rng);
    values
}

/// An array with exactly `values.len()` reserved slots, filled in order.
pub fn filled_array<'a, A>(
    options: &'a ArrayOptions<'a, u32, A>,
    values: &[u32],
) -> Result<DynamicArray<'a, u32, A>, ArrayError>
where
    A: Allocator + ?Sized,
{
    let mut array = DynamicArray::with_reserve(options, values.len().max(1))?;
    for v in values {
        array.append(v)?;
    }
    Ok(array)
}
