//! keel: deterministic, swappable memory strategies and allocator-backed
//! containers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all keel sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use keel::prelude::*;
//!
//! // A 4 KiB arena on the stack; every array buffer comes from it.
//! let mut backing = [0u8; 4096];
//! let arena = BumpAllocator::new(&mut backing).unwrap();
//! let options = ArrayOptions::<u32, _>::new(&arena).unwrap();
//!
//! let mut array = DynamicArray::with_reserve(&options, 2).unwrap();
//! array.append(&30).unwrap();
//! array.append(&10).unwrap();
//! assert!(array.append(&20).is_err()); // growth is explicit
//! array.grow(4).unwrap();
//! array.append(&20).unwrap();
//!
//! array.sort().unwrap();
//! assert_eq!(array.as_slice(), &[10, 20, 30]);
//! assert_eq!(array.binary_search(&20), Some(&20));
//! ```
//!
//! # Arena resets
//!
//! Resetting a [`BumpAllocator`](alloc::BumpAllocator) takes `&mut self`,
//! and every array built on the arena borrows it, so a reset while an
//! array is alive does not compile:
//!
//! ```compile_fail
//! use keel::prelude::*;
//!
//! let mut backing = [0u8; 256];
//! let mut arena = BumpAllocator::new(&mut backing).unwrap();
//! let options = ArrayOptions::<u32, _>::new(&arena).unwrap();
//! let array = DynamicArray::init(&options, 4, 4, Some(&7)).unwrap();
//! arena.reset();
//! assert_eq!(array.as_slice(), &[7; 4]);
//! ```
//!
//! The same holds for [`ControlKey::Reset`](types::ControlKey::Reset),
//! which only [`allocator_control`](alloc::allocator_control) accepts.
//! Once the arrays are gone the arena can be reused:
//!
//! ```rust
//! use keel::prelude::*;
//!
//! let mut backing = [0u8; 256];
//! let mut arena = BumpAllocator::new(&mut backing).unwrap();
//! {
//!     let options = ArrayOptions::<u32, _>::new(&arena).unwrap();
//!     let array = DynamicArray::init(&options, 4, 4, Some(&7)).unwrap();
//!     assert_eq!(array.as_slice(), &[7; 4]);
//! }
//! assert_eq!(allocator_control(&mut arena, ControlKey::Reset), Ok(0));
//! assert_eq!(arena.used(), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `keel-core` | Errors, status codes, control keys, `Dispose` |
//! | [`alloc`] | `keel-alloc` | `Allocator` trait, heap and bump backends |
//! | [`array`] | `keel-array` | `DynamicArray`, `ArrayOptions`, element operations |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Errors, status codes, control keys and the `Dispose` trait
/// (`keel-core`).
pub use keel_core as types;

/// Allocator abstraction and backends (`keel-alloc`).
pub use keel_alloc as alloc;

/// Dynamic array engine (`keel-array`).
pub use keel_array as array;

/// The types most programs need.
pub mod prelude {
    pub use keel_alloc::{
        allocate, allocator_control, allocator_query, reallocate, release, Allocator, ArenaConfig,
        BumpAllocator, HeapAllocator,
    };
    pub use keel_array::{ArrayOptions, CustomOps, DefaultOps, DynamicArray, ElementOps};
    pub use keel_core::{dispose, AllocError, ArrayError, ControlKey, Dispose, KeelStatus};
}
