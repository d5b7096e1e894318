//! The dynamic array engine.

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::slice;

use keel_alloc::Allocator;
use keel_core::{ArrayError, Dispose};
use tracing::{debug, trace};

use crate::options::{ArrayOptions, DefaultOps, ElementOps};
use crate::raw::RawBuf;
use crate::search;
use crate::sort;

/// Contiguous, explicitly grown array whose memory comes from the
/// allocator named in its [`ArrayOptions`].
///
/// Invariant: `len() <= reserved()`. Slots `0..len()` hold live elements;
/// each was produced by [`ElementOps::copy`] and will be handed to
/// [`ElementOps::dispose`] exactly once.
///
/// Not safe for concurrent mutation; the type is neither `Send` nor
/// `Sync`.
pub struct DynamicArray<'a, T, A, O = DefaultOps>
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    options: &'a ArrayOptions<'a, T, A, O>,
    buf: RawBuf<'a, T, A, O>,
}

impl<'a, T, A, O> DynamicArray<'a, T, A, O>
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    /// Create an array with room for `reserve` elements, pre-populating
    /// the first `instance_count` slots with copies of `seed`.
    ///
    /// Fails with [`ArrayError::ZeroReserve`],
    /// [`ArrayError::InstanceCountExceedsReserve`] or
    /// [`ArrayError::MissingSeed`] on bad arguments and with
    /// [`ArrayError::InitAllocationFailed`] when the buffer cannot be
    /// allocated.
    pub fn init(
        options: &'a ArrayOptions<'a, T, A, O>,
        reserve: usize,
        instance_count: usize,
        seed: Option<&T>,
    ) -> Result<Self, ArrayError> {
        if reserve == 0 {
            return Err(ArrayError::ZeroReserve);
        }
        if instance_count > reserve {
            return Err(ArrayError::InstanceCountExceedsReserve {
                instance_count,
                reserve,
            });
        }
        let seed = match (instance_count, seed) {
            (0, _) => None,
            (_, Some(seed)) => Some(seed),
            (_, None) => return Err(ArrayError::MissingSeed),
        };

        let buf = RawBuf::with_capacity(options.allocator(), options.ops(), reserve);
        let mut buf = buf.map_err(|source| {
            debug!(reserve, %source, "array init allocation failed");
            ArrayError::InitAllocationFailed { source }
        })?;
        if let Some(seed) = seed {
            for _ in 0..instance_count {
                buf.push(options.ops().copy(seed));
            }
        }
        Ok(Self { options, buf })
    }

    /// Create an empty array with room for `reserve` elements.
    pub fn with_reserve(
        options: &'a ArrayOptions<'a, T, A, O>,
        reserve: usize,
    ) -> Result<Self, ArrayError> {
        Self::init(options, reserve, 0, None)
    }

    /// Copy `element` into the next free slot.
    ///
    /// Never grows the array: fails with [`ArrayError::NoReserve`] once
    /// every reserved slot is occupied.
    pub fn append(&mut self, element: &T) -> Result<(), ArrayError> {
        if self.buf.len() == self.buf.capacity() {
            return Err(ArrayError::NoReserve {
                reserved: self.buf.capacity(),
            });
        }
        self.buf.push(self.options.ops().copy(element));
        Ok(())
    }

    /// Move to a larger buffer with room for `new_reserve` elements.
    ///
    /// Live elements are copied into the new buffer with
    /// [`ElementOps::copy`], then the originals are disposed and the old
    /// buffer released. Fails with [`ArrayError::ShrinkRejected`] unless
    /// `new_reserve > reserved()`, and with
    /// [`ArrayError::GrowAllocationFailed`] if the new buffer cannot be
    /// allocated. The array is unchanged on failure.
    pub fn grow(&mut self, new_reserve: usize) -> Result<(), ArrayError> {
        let reserved = self.reserved();
        if new_reserve <= reserved {
            return Err(ArrayError::ShrinkRejected {
                requested: new_reserve,
                reserved,
            });
        }
        let options = self.options;
        let fresh = RawBuf::with_capacity(options.allocator(), options.ops(), new_reserve);
        let mut fresh = fresh.map_err(|source| {
            debug!(reserved, new_reserve, %source, "array grow allocation failed");
            ArrayError::GrowAllocationFailed { source }
        })?;
        for elem in self.buf.as_slice() {
            fresh.push(options.ops().copy(elem));
        }
        // Dropping the old buffer disposes the originals.
        drop(mem::replace(&mut self.buf, fresh));
        trace!(reserved = new_reserve, elements = self.len(), "array grown");
        Ok(())
    }

    /// First element comparing equal to `key`, scanning from slot 0.
    ///
    /// Uses `compare` when given, otherwise the options' comparison.
    /// Correct for any element order.
    pub fn linear_search(
        &self,
        compare: Option<&dyn Fn(&T, &T) -> Ordering>,
        key: &T,
    ) -> Option<&T> {
        let idx = self.linear_search_index(compare, key)?;
        self.get(idx)
    }

    /// Slot index of the first element comparing equal to `key`.
    pub fn linear_search_index(
        &self,
        compare: Option<&dyn Fn(&T, &T) -> Ordering>,
        key: &T,
    ) -> Option<usize> {
        match compare {
            Some(compare) => search::linear_search(self.as_slice(), key, compare),
            None => {
                let ops = self.options.ops();
                search::linear_search(self.as_slice(), key, |a, b| ops.compare(a, b))
            }
        }
    }

    /// An element comparing equal to `key`, found by bisection.
    ///
    /// The array must already be sorted ascending under the options'
    /// comparison (for example by [`sort`](Self::sort)). This is not
    /// checked; on unsorted contents the result is unspecified.
    pub fn binary_search(&self, key: &T) -> Option<&T> {
        let idx = self.binary_search_index(key)?;
        self.get(idx)
    }

    /// Slot index of an element comparing equal to `key`; same
    /// precondition as [`binary_search`](Self::binary_search).
    pub fn binary_search_index(&self, key: &T) -> Option<usize> {
        let ops = self.options.ops();
        search::binary_search(self.as_slice(), key, |a, b| ops.compare(a, b))
    }

    /// Sort the live elements ascending under the options' comparison.
    ///
    /// Merge sort into a fresh full-reserve buffer; the array switches to
    /// it only after the whole sort succeeded, so on failure the contents
    /// are untouched. Fails with [`ArrayError::SortEmpty`] on an empty
    /// array and [`ArrayError::SortAllocationFailed`] if any scratch buffer
    /// cannot be allocated. Relative order of equal elements is not part
    /// of the contract.
    pub fn sort(&mut self) -> Result<(), ArrayError> {
        if self.is_empty() {
            return Err(ArrayError::SortEmpty);
        }
        let options = self.options;
        let sorted = sort::merge_sort(
            self.buf.as_slice(),
            self.buf.capacity(),
            options.allocator(),
            options.ops(),
        )
        .map_err(|source| {
            debug!(elements = self.len(), %source, "array sort allocation failed");
            ArrayError::SortAllocationFailed { source }
        })?;
        drop(mem::replace(&mut self.buf, sorted));
        trace!(elements = self.len(), "array sorted");
        Ok(())
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the array holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == 0
    }

    /// Capacity in elements.
    pub fn reserved(&self) -> usize {
        self.buf.capacity()
    }

    /// The live element at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable access to the live element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// The live elements.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// The live elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    /// Iterate over the live elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// The options this array was built from.
    pub fn options(&self) -> &'a ArrayOptions<'a, T, A, O> {
        self.options
    }
}

impl<T, A, O> Dispose for DynamicArray<'_, T, A, O>
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    fn dispose(self) {
        drop(self);
    }
}

impl<'s, T, A, O> IntoIterator for &'s DynamicArray<'_, T, A, O>
where
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    type Item = &'s T;
    type IntoIter = slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, A, O> fmt::Debug for DynamicArray<'_, T, A, O>
where
    T: fmt::Debug,
    A: Allocator + ?Sized,
    O: ElementOps<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("reserved", &self.reserved())
            .field("elements", &self.as_slice())
            .finish()
    }
}
