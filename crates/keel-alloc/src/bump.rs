//! Fixed-arena bump allocator.
//!
//! [`BumpAllocator`] carves aligned blocks out of one caller-supplied
//! buffer by advancing an offset. Individual releases are no-ops; the
//! whole arena is reclaimed by [`ControlKey::Reset`] or when the buffer
//! borrow ends. Resetting takes the arena by `&mut`, so it cannot happen
//! while anything still borrows the arena.
//!
//! ```text
//!  arena                                                   arena + max_size
//!  ┌──────┬──┬──────────┬────┬──────────────────────────────────┐
//!  │ blk0 │▒▒│   blk1   │▒▒▒▒│              free                │
//!  └──────┴──┴──────────┴────┴──────────────────────────────────┘
//!                                ▲ offset
//!  ▒ = alignment padding
//! ```

use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;

use keel_core::{AllocError, ControlKey, Dispose};
use tracing::{debug, trace};

use crate::allocator::Allocator;
use crate::config::ArenaConfig;

/// Bump allocator over a borrowed byte buffer.
///
/// Invariant: `0 <= offset <= max_size`, and every block handed out lies
/// within `[arena, arena + max_size)` at an address that is a multiple of
/// the configured alignment.
///
/// Allocation mutates the offset through a `Cell`, so the arena cannot be
/// shared across threads; callers serialise access themselves.
#[derive(Debug)]
pub struct BumpAllocator<'buf> {
    /// First usable byte of the buffer.
    arena: NonNull<u8>,
    /// Usable arena size in bytes.
    max_size: usize,
    /// Bytes consumed so far, padding included.
    offset: Cell<usize>,
    alignment: usize,
    _buffer: PhantomData<&'buf mut [u8]>,
}

impl<'buf> BumpAllocator<'buf> {
    /// Create an arena over `buffer` with the default 16-byte alignment.
    ///
    /// Fails with [`AllocError::BufferTooSmall`] if the buffer is shorter
    /// than one alignment unit.
    pub fn new(buffer: &'buf mut [u8]) -> Result<Self, AllocError> {
        Self::with_config(buffer, ArenaConfig::default())
    }

    /// Create an arena over `buffer` with an explicit configuration.
    pub fn with_config(buffer: &'buf mut [u8], config: ArenaConfig) -> Result<Self, AllocError> {
        config.validate()?;
        let minimum = config.alignment;
        if buffer.len() < minimum {
            return Err(AllocError::BufferTooSmall {
                size: buffer.len(),
                minimum,
            });
        }
        Ok(Self {
            max_size: buffer.len(),
            arena: NonNull::from(buffer).cast::<u8>(),
            offset: Cell::new(0),
            alignment: config.alignment,
            _buffer: PhantomData,
        })
    }

    /// Rewind the bump pointer to the start of the arena.
    ///
    /// Needs exclusive access: containers borrow the arena for as long as
    /// they hold blocks from it, so none can be alive here. Raw blocks
    /// obtained through [`allocate`](crate::allocate) are not tracked and
    /// must not be used after the reset.
    pub fn reset(&mut self) {
        trace!(offset = self.offset.get(), "bump arena reset");
        self.offset.set(0);
    }

    /// Bytes consumed so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Usable arena size in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Bytes between the bump pointer and the end of the arena.
    pub fn remaining(&self) -> usize {
        self.max_size - self.offset.get()
    }

    /// Offset of the next aligned address at or after the bump pointer.
    fn next_aligned_offset(&self) -> Option<usize> {
        let base = self.arena.as_ptr() as usize;
        let cursor = base.checked_add(self.offset.get())?;
        let aligned = cursor.checked_add(self.alignment - 1)? & !(self.alignment - 1);
        Some(aligned - base)
    }
}

#[allow(unsafe_code)]
impl Allocator for BumpAllocator<'_> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let start = self.next_aligned_offset()?;
        let end = start.checked_add(size)?;
        // Strict: the last byte of the arena is never handed out.
        if end >= self.max_size {
            debug!(
                requested = size,
                offset = self.offset.get(),
                max_size = self.max_size,
                "bump arena exhausted"
            );
            return None;
        }
        self.offset.set(end);
        NonNull::new(self.arena.as_ptr().wrapping_add(start))
    }

    unsafe fn release(&self, _block: NonNull<u8>, _size: usize) {}

    fn query(&self, key: ControlKey) -> Result<usize, AllocError> {
        match key {
            ControlKey::Used => Ok(self.used()),
            ControlKey::Capacity => Ok(self.capacity()),
            ControlKey::Reset | ControlKey::Vendor(_) => Err(AllocError::InvalidKey { key }),
        }
    }

    fn control(&mut self, key: ControlKey) -> Result<usize, AllocError> {
        match key {
            ControlKey::Reset => {
                self.reset();
                Ok(0)
            }
            _ => self.query(key),
        }
    }

    fn alignment(&self) -> usize {
        self.alignment
    }
}

impl Dispose for BumpAllocator<'_> {
    fn dispose(mut self) {
        self.reset();
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::allocator::{allocate, allocator_control, allocator_query, reallocate, release};

    #[repr(align(64))]
    struct Aligned<const N: usize>([u8; N]);

    impl<const N: usize> Aligned<N> {
        fn new() -> Self {
            Aligned([0; N])
        }
    }

    fn offset_of(arena: &BumpAllocator<'_>, block: NonNull<u8>) -> usize {
        block.as_ptr() as usize - arena.arena.as_ptr() as usize
    }

    fn fill(block: NonNull<u8>, len: usize) {
        for i in 0..len {
            // SAFETY: block is valid for len bytes.
            unsafe { block.as_ptr().add(i).write(i as u8 ^ 0x5a) };
        }
    }

    fn read(block: NonNull<u8>, len: usize) -> Vec<u8> {
        // SAFETY: block is valid and initialised for len bytes.
        unsafe { std::slice::from_raw_parts(block.as_ptr(), len) }.to_vec()
    }

    #[test]
    fn buffer_smaller_than_alignment_rejected() {
        let mut buf = [0u8; 8];
        assert_eq!(
            BumpAllocator::new(&mut buf).unwrap_err(),
            AllocError::BufferTooSmall {
                size: 8,
                minimum: 16
            }
        );
    }

    #[test]
    fn invalid_config_rejected() {
        let mut buf = [0u8; 64];
        let config = ArenaConfig::new().with_alignment(12);
        assert!(matches!(
            BumpAllocator::with_config(&mut buf, config),
            Err(AllocError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn fresh_arena_reports_full_capacity() {
        let mut buf = Aligned::<256>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        assert_eq!(arena.capacity(), 256);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.remaining(), 256);
    }

    #[test]
    fn allocations_are_padded_to_alignment() {
        let mut buf = Aligned::<256>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        let a = allocate(&arena, 3).unwrap();
        let b = allocate(&arena, 5).unwrap();
        assert_eq!(offset_of(&arena, a), 0);
        assert_eq!(offset_of(&arena, b), 16);
        assert_eq!(arena.used(), 21);
    }

    #[test]
    fn last_byte_is_never_handed_out() {
        let mut buf = Aligned::<256>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        assert_eq!(
            allocate(&arena, 256),
            Err(AllocError::Exhausted { requested: 256 })
        );
        assert!(allocate(&arena, 255).is_ok());
        assert!(allocate(&arena, 1).is_err());
    }

    #[test]
    fn failure_leaves_offset_unchanged() {
        let mut buf = Aligned::<128>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        allocate(&arena, 40).unwrap();
        let before = arena.used();
        assert!(allocate(&arena, 100).is_err());
        assert_eq!(arena.used(), before);
        // A request that still fits succeeds after the failure.
        assert!(allocate(&arena, 10).is_ok());
    }

    #[test]
    fn release_is_a_no_op() {
        let mut buf = Aligned::<128>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        let block = allocate(&arena, 32).unwrap();
        unsafe { release(&arena, block, 32) };
        assert_eq!(arena.used(), 32);
    }

    #[test]
    fn reset_replays_identical_addresses() {
        let mut buf = Aligned::<1024>::new();
        let mut arena = BumpAllocator::new(&mut buf.0).unwrap();
        let sizes = [7, 64, 1, 33, 100];
        let first: Vec<_> = sizes
            .iter()
            .map(|&s| allocate(&arena, s).unwrap())
            .collect();
        assert_eq!(allocator_control(&mut arena, ControlKey::Reset), Ok(0));
        assert_eq!(arena.used(), 0);
        let second: Vec<_> = sizes
            .iter()
            .map(|&s| allocate(&arena, s).unwrap())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn emulated_reallocate_copies_and_wastes_old_block() {
        let mut buf = Aligned::<512>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        let block = allocate(&arena, 100).unwrap();
        fill(block, 100);
        let before = read(block, 100);

        let grown = unsafe { reallocate(&arena, block, 100, 200) }.unwrap();
        assert_ne!(grown, block);
        assert_eq!(read(grown, 100), before);
        assert_eq!(arena.used(), 112 + 200);
    }

    #[test]
    fn failed_reallocate_keeps_original_block() {
        let mut buf = Aligned::<256>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        let block = allocate(&arena, 100).unwrap();
        fill(block, 100);
        let before = read(block, 100);

        let result = unsafe { reallocate(&arena, block, 100, 200) };
        assert_eq!(result, Err(AllocError::Exhausted { requested: 200 }));
        assert_eq!(read(block, 100), before);
        assert_eq!(arena.used(), 100);
    }

    #[test]
    fn control_keys() {
        let mut buf = Aligned::<128>::new();
        let mut arena = BumpAllocator::new(&mut buf.0).unwrap();
        allocate(&arena, 20).unwrap();
        assert_eq!(allocator_control(&mut arena, ControlKey::Used), Ok(20));
        let capacity = allocator_control(&mut arena, ControlKey::Capacity);
        assert_eq!(capacity, Ok(128));
        assert_eq!(
            allocator_control(&mut arena, ControlKey::Vendor(1)),
            Err(AllocError::InvalidKey {
                key: ControlKey::Vendor(1)
            })
        );
    }

    #[test]
    fn shared_queries_answer_read_only_keys() {
        let mut buf = Aligned::<128>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        allocate(&arena, 20).unwrap();
        let shared = &arena;
        assert_eq!(allocator_query(shared, ControlKey::Used), Ok(20));
        assert_eq!(allocator_query(shared, ControlKey::Capacity), Ok(128));
    }

    #[test]
    fn reset_is_refused_through_a_shared_reference() {
        let mut buf = Aligned::<128>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        allocate(&arena, 20).unwrap();

        // `&BumpAllocator` is itself an allocator; resetting through it
        // would pull blocks out from under the other borrowers.
        let mut shared = &arena;
        assert_eq!(
            allocator_control(&mut shared, ControlKey::Reset),
            Err(AllocError::InvalidKey {
                key: ControlKey::Reset
            })
        );
        assert_eq!(
            allocator_query(&arena, ControlKey::Reset),
            Err(AllocError::InvalidKey {
                key: ControlKey::Reset
            })
        );
        assert_eq!(arena.used(), 20);
    }

    #[test]
    fn custom_alignment_is_honoured() {
        let mut buf = Aligned::<512>::new();
        let config = ArenaConfig::new().with_alignment(64);
        let arena = BumpAllocator::with_config(&mut buf.0, config).unwrap();
        assert_eq!(arena.alignment(), 64);
        allocate(&arena, 1).unwrap();
        let second = allocate(&arena, 1).unwrap();
        assert_eq!(second.as_ptr() as usize % 64, 0);
        assert_eq!(offset_of(&arena, second), 64);
    }

    #[test]
    fn misaligned_buffer_still_yields_aligned_blocks() {
        let mut buf = Aligned::<256>::new();
        let arena = BumpAllocator::new(&mut buf.0[3..]).unwrap();
        let block = allocate(&arena, 8).unwrap();
        assert_eq!(block.as_ptr() as usize % 16, 0);
        assert_eq!(offset_of(&arena, block), 13);
    }

    #[test]
    fn dispose_rewinds_arena() {
        let mut buf = Aligned::<64>::new();
        let arena = BumpAllocator::new(&mut buf.0).unwrap();
        allocate(&arena, 16).unwrap();
        keel_core::dispose(arena);
        // The buffer is usable again once the arena is gone.
        buf.0[0] = 1;
        assert_eq!(buf.0[0], 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_block_is_aligned_and_in_bounds(
                skew in 0usize..16,
                sizes in proptest::collection::vec(1usize..200, 1..40),
            ) {
                let mut buf = Aligned::<4096>::new();
                let arena = BumpAllocator::new(&mut buf.0[skew..]).unwrap();
                let lo = arena.arena.as_ptr() as usize;
                let hi = lo + arena.capacity();
                for size in sizes {
                    let used = arena.used();
                    match allocate(&arena, size) {
                        Ok(block) => {
                            let addr = block.as_ptr() as usize;
                            prop_assert_eq!(addr % 16, 0);
                            prop_assert!(addr >= lo && addr + size < hi);
                            prop_assert!(arena.used() <= arena.capacity());
                        }
                        Err(_) => prop_assert_eq!(arena.used(), used),
                    }
                }
            }

            #[test]
            fn identical_sequences_are_deterministic(
                sizes in proptest::collection::vec(1usize..300, 1..20),
            ) {
                let mut buf = Aligned::<2048>::new();
                let mut arena = BumpAllocator::new(&mut buf.0).unwrap();
                let first: Vec<_> = sizes.iter().map(|&s| allocate(&arena, s).ok()).collect();
                arena.reset();
                let second: Vec<_> = sizes.iter().map(|&s| allocate(&arena, s).ok()).collect();
                prop_assert_eq!(first, second);
            }
        }
    }
}
