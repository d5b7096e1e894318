//! Typed slot buffer over allocator-provided memory.
//!
//! [`RawBuf`] owns one block obtained through the allocator abstraction
//! and tracks how many leading slots hold live values. All pointer work of
//! the array engine happens here; each `unsafe` block carries a
//! `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;
use std::slice;

use keel_alloc::{allocate, release, Allocator};
use keel_core::AllocError;

use crate::options::ElementOps;

/// `cap` slots of `T`, the first `len` of them initialised.
///
/// Live values leave the buffer only through `ops.dispose`, including
/// when the buffer is dropped during unwinding.
pub(crate) struct RawBuf<'a, T, A: Allocator + ?Sized, O: ElementOps<T>> {
    allocator: &'a A,
    ops: &'a O,
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _owns: PhantomData<T>,
}

impl<'a, T, A: Allocator + ?Sized, O: ElementOps<T>> RawBuf<'a, T, A, O> {
    /// Allocate room for `cap` elements. `T` must not be zero-sized.
    pub(crate) fn with_capacity(
        allocator: &'a A,
        ops: &'a O,
        cap: usize,
    ) -> Result<Self, AllocError> {
        debug_assert!(
            mem::size_of::<T>() > 0,
            "zero-sized elements are rejected by ArrayOptions"
        );
        let bytes = Self::bytes_for(cap)?;
        let block = allocate(allocator, bytes)?;
        let align = mem::align_of::<T>();
        if block.as_ptr() as usize % align != 0 {
            // SAFETY: block was just returned by `allocator` for `bytes`.
            unsafe { release(allocator, block, bytes) };
            return Err(AllocError::Misaligned { align });
        }
        Ok(Self {
            allocator,
            ops,
            ptr: block.cast::<T>(),
            cap,
            len: 0,
            _owns: PhantomData,
        })
    }

    fn bytes_for(cap: usize) -> Result<usize, AllocError> {
        cap.checked_mul(mem::size_of::<T>())
            .ok_or(AllocError::SizeOverflow)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Move `value` into the next free slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is occupied.
    pub(crate) fn push(&mut self, value: T) {
        assert!(self.len < self.cap, "RawBuf::push past capacity");
        // SAFETY: len < cap, so the slot lies inside the block, is aligned
        // for T (checked at allocation) and holds no live value.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialised and the block is
        // valid for `cap >= len` elements.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: Allocator + ?Sized, O: ElementOps<T>> Drop for RawBuf<'_, T, A, O> {
    /// Hand every live value to `ops.dispose`, first slot first, then
    /// release the block.
    ///
    /// If `dispose` panics the values not yet handed out, and the block,
    /// are leaked rather than dropped twice.
    fn drop(&mut self) {
        let live = self.len;
        self.len = 0;
        for i in 0..live {
            // SAFETY: slot i < live was initialised; len is already 0, so
            // no other path reads it again.
            let value = unsafe { self.ptr.as_ptr().add(i).read() };
            self.ops.dispose(value);
        }
        // Cannot overflow: checked when the block was allocated.
        let bytes = self.cap * mem::size_of::<T>();
        // SAFETY: the block came from `allocator` for `bytes` and is not
        // referenced after this point.
        unsafe { release(self.allocator, self.ptr.cast::<u8>(), bytes) };
    }
}
