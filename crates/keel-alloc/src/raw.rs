//! Low-level byte primitives behind the allocator backends.
//!
//! Every function here wraps exactly one operation of the Rust global
//! allocator or one byte copy. Each `unsafe` block carries a `// SAFETY:`
//! comment; callers restate the contract at their own call sites.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

/// Allocate `size` bytes aligned to `align` from the global allocator.
///
/// Returns `None` for an invalid layout, a zero size, or allocator failure.
pub(crate) fn global_alloc(size: usize, align: usize) -> Option<NonNull<u8>> {
    if size == 0 {
        return None;
    }
    let layout = Layout::from_size_align(size, align).ok()?;
    // SAFETY: layout has a non-zero size.
    NonNull::new(unsafe { alloc::alloc(layout) })
}

/// Return a block to the global allocator.
///
/// # Safety
///
/// `block` must have been returned by [`global_alloc`] or
/// [`global_realloc`] with the same `size` and `align`, and must not be
/// used afterwards.
pub(crate) unsafe fn global_dealloc(block: NonNull<u8>, size: usize, align: usize) {
    // SAFETY: the caller guarantees (size, align) formed a valid layout
    // when the block was allocated.
    let layout = unsafe { Layout::from_size_align_unchecked(size, align) };
    // SAFETY: block was allocated by the global allocator with `layout`.
    unsafe { alloc::dealloc(block.as_ptr(), layout) }
}

/// Resize a block in the global allocator.
///
/// On failure returns `None` and `block` stays valid with its old size.
///
/// # Safety
///
/// `block` must have been returned by [`global_alloc`] or
/// [`global_realloc`] with `old_size` and `align`. On success `block` must
/// not be used again.
pub(crate) unsafe fn global_realloc(
    block: NonNull<u8>,
    old_size: usize,
    new_size: usize,
    align: usize,
) -> Option<NonNull<u8>> {
    if new_size == 0 {
        return None;
    }
    Layout::from_size_align(new_size, align).ok()?;
    // SAFETY: caller guarantees the old layout is the allocation layout.
    let old_layout = unsafe { Layout::from_size_align_unchecked(old_size, align) };
    // SAFETY: block came from the global allocator with old_layout;
    // new_size is non-zero and does not overflow when rounded to align
    // (checked above).
    NonNull::new(unsafe { alloc::realloc(block.as_ptr(), old_layout, new_size) })
}

/// Copy `len` bytes from `src` to `dst`.
///
/// # Safety
///
/// Both blocks must be valid for `len` bytes and must not overlap.
pub(crate) unsafe fn copy_bytes(src: NonNull<u8>, dst: NonNull<u8>, len: usize) {
    // SAFETY: forwarded from the caller.
    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), len) }
}
