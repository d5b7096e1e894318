//! The allocator abstraction and its validating entry points.
//!
//! [`Allocator`] is the capability every backend implements. Containers
//! call the free functions in this module rather than the trait methods so
//! that argument validation and failure reporting happen in one place.

use std::ptr::NonNull;

use keel_core::{AllocError, ControlKey};
use tracing::trace;

use crate::{raw, MAX_ALIGN};

/// A pluggable source of raw memory blocks.
///
/// The implementing value is the backend's context: whatever state it
/// needs (an arena cursor, pool bookkeeping) lives in `self`. Methods take
/// `&self` so one allocator can be shared by many containers; backends
/// that mutate state on allocation use interior mutability and are
/// therefore not `Sync`.
///
/// Only [`allocate`](Allocator::allocate) and
/// [`release`](Allocator::release) are mandatory. A backend without a
/// native resize inherits the allocate+copy+release emulation, and one
/// without control operations rejects every key.
///
/// Control keys that invalidate outstanding blocks, such as
/// [`ControlKey::Reset`], go through [`control`](Allocator::control),
/// which needs `&mut self`. Containers hold the allocator by shared
/// reference, so the borrow checker refuses such a key while any of them
/// is alive. Read-only keys are also answered through
/// [`query`](Allocator::query).
#[allow(unsafe_code)]
pub trait Allocator {
    /// Return a fresh block of at least `size` bytes, aligned to
    /// [`alignment`](Allocator::alignment), or `None` when the backend
    /// cannot satisfy the request.
    ///
    /// `size` is never zero when called through [`allocate`].
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Give a block back to the backend.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by this allocator for a request of
    /// `size` bytes and not released since. It must not be dereferenced
    /// after this call.
    unsafe fn release(&self, block: NonNull<u8>, size: usize);

    /// Resize a block, preserving its first `min(old_size, new_size)`
    /// bytes.
    ///
    /// On success the old block must be treated as released. On failure
    /// `None` is returned and the old block is left valid and unchanged.
    ///
    /// # Safety
    ///
    /// Same contract as [`release`](Allocator::release) for `block` and
    /// `old_size`.
    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: forwarded from the caller.
        unsafe { reallocate_by_copy(self, block, old_size, new_size) }
    }

    /// Read-only backend introspection. Returns a key-dependent value on
    /// success; keys that would mutate the backend are rejected.
    fn query(&self, key: ControlKey) -> Result<usize, AllocError> {
        Err(AllocError::InvalidKey { key })
    }

    /// Backend-specific operations, including ones that invalidate every
    /// block handed out so far. Falls back to [`query`](Allocator::query)
    /// for keys the backend does not mutate on.
    fn control(&mut self, key: ControlKey) -> Result<usize, AllocError> {
        self.query(key)
    }

    /// Alignment, in bytes, guaranteed for every block this allocator
    /// returns.
    fn alignment(&self) -> usize {
        MAX_ALIGN
    }
}

#[allow(unsafe_code)]
impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        (**self).allocate(size)
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).release(block, size) }
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).reallocate(block, old_size, new_size) }
    }

    fn query(&self, key: ControlKey) -> Result<usize, AllocError> {
        (**self).query(key)
    }

    fn alignment(&self) -> usize {
        (**self).alignment()
    }
}

/// Resize by allocating a new block, copying the common prefix and
/// releasing the old block.
///
/// If the new allocation fails nothing is copied or released.
///
/// # Safety
///
/// `block` must have been returned by `allocator` for `old_size` bytes and
/// not released since.
#[allow(unsafe_code)]
pub unsafe fn reallocate_by_copy<A: Allocator + ?Sized>(
    allocator: &A,
    block: NonNull<u8>,
    old_size: usize,
    new_size: usize,
) -> Option<NonNull<u8>> {
    let fresh = allocator.allocate(new_size)?;
    // SAFETY: `block` is valid for old_size bytes, `fresh` for new_size
    // bytes, and a live block never overlaps a freshly allocated one.
    unsafe { raw::copy_bytes(block, fresh, old_size.min(new_size)) };
    // SAFETY: caller guarantees block/old_size came from this allocator.
    unsafe { allocator.release(block, old_size) };
    Some(fresh)
}

/// Allocate `size` bytes through `allocator`.
///
/// Fails with [`AllocError::ZeroSize`] for a zero-byte request and
/// [`AllocError::Exhausted`] when the backend returns nothing.
pub fn allocate<A: Allocator + ?Sized>(
    allocator: &A,
    size: usize,
) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
        return Err(AllocError::ZeroSize);
    }
    allocator.allocate(size).ok_or_else(|| {
        trace!(requested = size, "allocation failed");
        AllocError::Exhausted { requested: size }
    })
}

/// Release a block previously obtained from `allocator`.
///
/// # Safety
///
/// `block` must have been returned by `allocator` for a request of `size`
/// bytes and not released since. The block is dangling afterwards.
#[allow(unsafe_code)]
pub unsafe fn release<A: Allocator + ?Sized>(allocator: &A, block: NonNull<u8>, size: usize) {
    debug_assert!(size > 0, "released block must have a non-zero size");
    // SAFETY: forwarded from the caller.
    unsafe { allocator.release(block, size) }
}

/// Resize a block previously obtained from `allocator`.
///
/// Delegates to the backend's native resize when it has one, otherwise
/// allocates, copies `min(old_size, new_size)` bytes and releases. On
/// failure the original block is untouched and still owned by the caller.
///
/// # Safety
///
/// `block` must have been returned by `allocator` for `old_size` bytes and
/// not released since. On success the old block is dangling.
#[allow(unsafe_code)]
pub unsafe fn reallocate<A: Allocator + ?Sized>(
    allocator: &A,
    block: NonNull<u8>,
    old_size: usize,
    new_size: usize,
) -> Result<NonNull<u8>, AllocError> {
    if new_size == 0 {
        return Err(AllocError::ZeroSize);
    }
    // SAFETY: forwarded from the caller.
    unsafe { allocator.reallocate(block, old_size, new_size) }.ok_or_else(|| {
        trace!(old_size, requested = new_size, "reallocation failed");
        AllocError::Exhausted {
            requested: new_size,
        }
    })
}

/// Forward a control request to the backend.
///
/// Takes the allocator exclusively: a key such as [`ControlKey::Reset`]
/// cannot run while a container still borrows the allocator.
pub fn allocator_control<A: Allocator + ?Sized>(
    allocator: &mut A,
    key: ControlKey,
) -> Result<usize, AllocError> {
    allocator.control(key)
}

/// Forward a read-only control request to the backend.
pub fn allocator_query<A: Allocator + ?Sized>(
    allocator: &A,
    key: ControlKey,
) -> Result<usize, AllocError> {
    allocator.query(key)
}
