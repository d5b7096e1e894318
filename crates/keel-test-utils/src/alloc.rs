//! Allocator doubles.
//!
//! - [`FailingAllocator`]: succeeds for a fixed number of allocations,
//!   then refuses every request.
//! - [`CountingAllocator`]: tracks live blocks and bytes so tests can
//!   assert that nothing leaked.
//!
//! Both wrap an inner allocator and use the allocate+copy+release
//! emulation for resizing so that every byte they hand out is visible to
//! their counters.

#![allow(unsafe_code)]

use std::cell::Cell;
use std::ptr::NonNull;

use keel_alloc::{Allocator, HeapAllocator};
use keel_core::{AllocError, ControlKey};

/// Allocator that fails once its allocation budget runs out.
pub struct FailingAllocator<A = HeapAllocator> {
    inner: A,
    budget: Cell<Option<usize>>,
    refused: Cell<usize>,
}

impl<A: Allocator> FailingAllocator<A> {
    /// Wrap `inner` with an unlimited budget.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            budget: Cell::new(None),
            refused: Cell::new(0),
        }
    }

    /// Wrap `inner`, allowing exactly `successes` allocations.
    pub fn fail_after(inner: A, successes: usize) -> Self {
        let alloc = Self::new(inner);
        alloc.set_budget(Some(successes));
        alloc
    }

    /// Replace the remaining budget. `None` means unlimited.
    pub fn set_budget(&self, budget: Option<usize>) {
        self.budget.set(budget);
    }

    /// Number of requests refused so far.
    pub fn refused(&self) -> usize {
        self.refused.get()
    }
}

impl<A: Allocator> Allocator for FailingAllocator<A> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        match self.budget.get() {
            Some(0) => {
                self.refused.set(self.refused.get() + 1);
                None
            }
            Some(n) => {
                self.budget.set(Some(n - 1));
                self.inner.allocate(size)
            }
            None => self.inner.allocate(size),
        }
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize) {
        // SAFETY: every block came from `inner`.
        unsafe { self.inner.release(block, size) }
    }

    fn query(&self, key: ControlKey) -> Result<usize, AllocError> {
        self.inner.query(key)
    }

    fn control(&mut self, key: ControlKey) -> Result<usize, AllocError> {
        self.inner.control(key)
    }

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }
}

/// Allocator that counts blocks and bytes in flight.
pub struct CountingAllocator<A = HeapAllocator> {
    inner: A,
    live_blocks: Cell<usize>,
    live_bytes: Cell<usize>,
    allocations: Cell<usize>,
    releases: Cell<usize>,
}

impl<A: Allocator> CountingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            live_blocks: Cell::new(0),
            live_bytes: Cell::new(0),
            allocations: Cell::new(0),
            releases: Cell::new(0),
        }
    }

    /// Blocks allocated and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.live_blocks.get()
    }

    /// Bytes allocated and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Releases so far.
    pub fn releases(&self) -> usize {
        self.releases.get()
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl Default for CountingAllocator<HeapAllocator> {
    fn default() -> Self {
        Self::new(HeapAllocator)
    }
}

impl<A: Allocator> Allocator for CountingAllocator<A> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let block = self.inner.allocate(size)?;
        self.allocations.set(self.allocations.get() + 1);
        self.live_blocks.set(self.live_blocks.get() + 1);
        self.live_bytes.set(self.live_bytes.get() + size);
        Some(block)
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize) {
        self.releases.set(self.releases.get() + 1);
        self.live_blocks.set(self.live_blocks.get() - 1);
        self.live_bytes.set(self.live_bytes.get() - size);
        // SAFETY: every block came from `inner`.
        unsafe { self.inner.release(block, size) }
    }

    fn query(&self, key: ControlKey) -> Result<usize, AllocError> {
        self.inner.query(key)
    }

    fn control(&mut self, key: ControlKey) -> Result<usize, AllocError> {
        self.inner.control(key)
    }

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_alloc::{allocate, release};

    #[test]
    fn budget_is_consumed_then_refused() {
        let alloc = FailingAllocator::fail_after(HeapAllocator, 1);
        let block = allocate(&alloc, 8).unwrap();
        assert!(allocate(&alloc, 8).is_err());
        assert_eq!(alloc.refused(), 1);
        unsafe { release(&alloc, block, 8) };
    }

    #[test]
    fn counting_tracks_live_blocks() {
        let alloc = CountingAllocator::new(HeapAllocator);
        let a = allocate(&alloc, 10).unwrap();
        let b = allocate(&alloc, 20).unwrap();
        assert_eq!(alloc.live_blocks(), 2);
        assert_eq!(alloc.live_bytes(), 30);
        unsafe { release(&alloc, a, 10) };
        unsafe { release(&alloc, b, 20) };
        assert_eq!(alloc.live_blocks(), 0);
        assert_eq!(alloc.allocations(), 2);
        assert_eq!(alloc.releases(), 2);
    }

    #[test]
    fn refused_allocation_is_not_counted() {
        let alloc = CountingAllocator::new(FailingAllocator::fail_after(HeapAllocator, 0));
        assert!(allocate(&alloc, 4).is_err());
        assert_eq!(alloc.allocations(), 0);
        assert_eq!(alloc.inner().refused(), 1);
    }
}
