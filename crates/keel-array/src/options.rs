//! Array configuration: allocator reference and element operations.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use keel_alloc::Allocator;
use keel_core::ArrayError;

/// Copy, dispose and compare operations for one element type.
///
/// The array never duplicates or destroys an element except through these
/// hooks. `copy` is used for every slot the array fills (seeding, append,
/// grow, sort), so types that must fix up internal state when duplicated
/// can do it there.
pub trait ElementOps<T> {
    /// Produce an independent copy of `src`.
    fn copy(&self, src: &T) -> T;

    /// Tear down an element the array no longer holds.
    fn dispose(&self, elem: T) {
        drop(elem);
    }

    /// Total order used by sorting and binary search.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// `Clone` for copy, `Drop` for dispose, `Ord` for compare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultOps;

impl<T: Clone + Ord> ElementOps<T> for DefaultOps {
    fn copy(&self, src: &T) -> T {
        src.clone()
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Element operations given as function pointers plus a shared context.
///
/// Each slot starts out as the `Clone`/`Drop`/`Ord` behaviour when built
/// with [`CustomOps::new`]; override individual slots with the `with_*`
/// methods.
pub struct CustomOps<T, C = ()> {
    context: C,
    copy: fn(&C, &T) -> T,
    dispose: fn(&C, T),
    compare: fn(&T, &T) -> Ordering,
}

fn clone_copy<C, T: Clone>(_: &C, src: &T) -> T {
    src.clone()
}

fn drop_dispose<C, T>(_: &C, elem: T) {
    drop(elem);
}

fn ord_compare<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

impl<T: Clone + Ord, C> CustomOps<T, C> {
    /// Default operations carrying `context`.
    pub fn new(context: C) -> Self {
        Self::from_fns(
            context,
            clone_copy::<C, T>,
            drop_dispose::<C, T>,
            ord_compare::<T>,
        )
    }
}

impl<T, C> CustomOps<T, C> {
    /// Build from explicit function pointers, for types without
    /// `Clone`/`Ord`.
    pub fn from_fns(
        context: C,
        copy: fn(&C, &T) -> T,
        dispose: fn(&C, T),
        compare: fn(&T, &T) -> Ordering,
    ) -> Self {
        Self {
            context,
            copy,
            dispose,
            compare,
        }
    }

    /// Replace the copy operation.
    pub fn with_copy(mut self, copy: fn(&C, &T) -> T) -> Self {
        self.copy = copy;
        self
    }

    /// Replace the dispose operation.
    pub fn with_dispose(mut self, dispose: fn(&C, T)) -> Self {
        self.dispose = dispose;
        self
    }

    /// Replace the comparison.
    pub fn with_compare(mut self, compare: fn(&T, &T) -> Ordering) -> Self {
        self.compare = compare;
        self
    }

    /// The shared context.
    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<T, C> ElementOps<T> for CustomOps<T, C> {
    fn copy(&self, src: &T) -> T {
        (self.copy)(&self.context, src)
    }

    fn dispose(&self, elem: T) {
        (self.dispose)(&self.context, elem);
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<T, C: fmt::Debug> fmt::Debug for CustomOps<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomOps")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Configuration shared by any number of arrays of `T`.
///
/// Immutable once built. Borrowed by every [`DynamicArray`] created from
/// it, so it (and the allocator it references) outlives those arrays.
///
/// [`DynamicArray`]: crate::DynamicArray
pub struct ArrayOptions<'a, T, A: Allocator + ?Sized, O = DefaultOps> {
    allocator: &'a A,
    ops: O,
    _element: PhantomData<fn(&T) -> T>,
}

impl<'a, T: Clone + Ord, A: Allocator + ?Sized> ArrayOptions<'a, T, A, DefaultOps> {
    /// Options with [`DefaultOps`].
    pub fn new(allocator: &'a A) -> Result<Self, ArrayError> {
        Self::with_ops(allocator, DefaultOps)
    }
}

impl<'a, T, A: Allocator + ?Sized, O: ElementOps<T>> ArrayOptions<'a, T, A, O> {
    /// Options with caller-supplied element operations.
    ///
    /// Fails with [`ArrayError::UnsupportedElement`] for zero-sized types
    /// and for types aligned more strictly than the allocator guarantees.
    pub fn with_ops(allocator: &'a A, ops: O) -> Result<Self, ArrayError> {
        let size = mem::size_of::<T>();
        let align = mem::align_of::<T>();
        if size == 0 || align > allocator.alignment() {
            return Err(ArrayError::UnsupportedElement { size, align });
        }
        Ok(Self {
            allocator,
            ops,
            _element: PhantomData,
        })
    }

    /// Size of one element slot in bytes.
    pub fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// The allocator every array built from these options uses.
    pub fn allocator(&self) -> &'a A {
        self.allocator
    }

    /// The element operations.
    pub fn ops(&self) -> &O {
        &self.ops
    }
}

impl<T, A: Allocator + ?Sized, O> fmt::Debug for ArrayOptions<'_, T, A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayOptions")
            .field("element_size", &mem::size_of::<T>())
            .field("alignment", &self.allocator.alignment())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_alloc::HeapAllocator;
    use std::cell::Cell;

    #[test]
    fn element_size_matches_type() {
        let heap = HeapAllocator;
        let opts = ArrayOptions::<u64, _>::new(&heap).unwrap();
        assert_eq!(opts.element_size(), 8);
    }

    #[test]
    fn zero_sized_elements_rejected() {
        let heap = HeapAllocator;
        let err = ArrayOptions::<(), _>::new(&heap).unwrap_err();
        assert_eq!(err, ArrayError::UnsupportedElement { size: 0, align: 1 });
    }

    #[test]
    fn over_aligned_elements_rejected() {
        #[repr(align(32))]
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
        struct Wide(u8);

        let heap = HeapAllocator;
        let err = ArrayOptions::<Wide, _>::new(&heap).unwrap_err();
        assert_eq!(
            err,
            ArrayError::UnsupportedElement {
                size: 32,
                align: 32
            }
        );
    }

    #[test]
    fn default_ops_clone_and_order() {
        let ops = DefaultOps;
        assert_eq!(ElementOps::<i32>::copy(&ops, &5), 5);
        assert_eq!(ops.compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn custom_ops_use_overrides_and_context() {
        fn counting_dispose(count: &Cell<u32>, _elem: i32) {
            count.set(count.get() + 1);
        }
        fn reversed(a: &i32, b: &i32) -> Ordering {
            b.cmp(a)
        }

        let ops = CustomOps::<i32, Cell<u32>>::new(Cell::new(0))
            .with_dispose(counting_dispose)
            .with_compare(reversed);
        ops.dispose(3);
        ops.dispose(4);
        assert_eq!(ops.context().get(), 2);
        assert_eq!(ops.compare(&1, &2), Ordering::Greater);
        assert_eq!(ops.copy(&9), 9);
    }
}
