//! Top-down merge sort through the allocator abstraction.
//!
//! Each recursion level allocates two scratch buffers for its halves,
//! sorts into them, merges them into the level's output and drops the
//! scratch, which disposes its copies. The input slice is only read, so a
//! failed scratch allocation anywhere leaves the caller's data untouched.

use std::cmp::Ordering;

use keel_alloc::Allocator;
use keel_core::AllocError;

use crate::options::ElementOps;
use crate::raw::RawBuf;

/// Sorted copies of `input` in a fresh buffer with room for `capacity`
/// elements.
///
/// On failure, or if `ops` panics, every buffer allocated along the way
/// has had its copies disposed and its block released.
pub(crate) fn merge_sort<'a, T, A, O>(
    input: &[T],
    capacity: usize,
    allocator: &'a A,
    ops: &'a O,
) -> Result<RawBuf<'a, T, A, O>, AllocError>
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    debug_assert!(capacity >= input.len());
    let mut output = RawBuf::with_capacity(allocator, ops, capacity)?;
    sort_into(input, &mut output, allocator, ops)?;
    Ok(output)
}

fn sort_into<'a, T, A, O>(
    input: &[T],
    output: &mut RawBuf<'a, T, A, O>,
    allocator: &'a A,
    ops: &'a O,
) -> Result<(), AllocError>
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    if input.len() <= 1 {
        for elem in input {
            output.push(ops.copy(elem));
        }
        return Ok(());
    }

    let (lo, hi) = input.split_at(input.len() / 2);
    let mut left = RawBuf::with_capacity(allocator, ops, lo.len())?;
    let mut right = RawBuf::with_capacity(allocator, ops, hi.len())?;
    sort_into(lo, &mut left, allocator, ops)?;
    sort_into(hi, &mut right, allocator, ops)?;
    merge(left.as_slice(), right.as_slice(), output, ops);
    Ok(())
}

/// Merge two sorted runs, taking the left element on ties, then copy the
/// slop of whichever run is left over.
fn merge<T, A, O>(left: &[T], right: &[T], output: &mut RawBuf<'_, T, A, O>, ops: &O)
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if ops.compare(&left[i], &right[j]) != Ordering::Greater {
            output.push(ops.copy(&left[i]));
            i += 1;
        } else {
            output.push(ops.copy(&right[j]));
            j += 1;
        }
    }
    for elem in left[i..].iter().chain(&right[j..]) {
        output.push(ops.copy(elem));
    }
}
