//! Pass-through allocator backed by the Rust global allocator.

use std::ptr::NonNull;

use keel_core::Dispose;

use crate::allocator::Allocator;
use crate::{raw, MAX_ALIGN};

/// Allocator that forwards every request to the global heap.
///
/// Keeps no bookkeeping of its own, resizes natively, and rejects every
/// control key. All blocks are aligned to [`MAX_ALIGN`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapAllocator;

impl HeapAllocator {
    /// Create a heap allocator.
    pub const fn new() -> Self {
        HeapAllocator
    }
}

#[allow(unsafe_code)]
impl Allocator for HeapAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        raw::global_alloc(size, MAX_ALIGN)
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize) {
        // SAFETY: caller guarantees the block came from `allocate` or
        // `reallocate` with this size, both of which use MAX_ALIGN.
        unsafe { raw::global_dealloc(block, size, MAX_ALIGN) }
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: as for `release`.
        unsafe { raw::global_realloc(block, old_size, new_size, MAX_ALIGN) }
    }
}

impl Dispose for HeapAllocator {
    fn dispose(self) {}
}
