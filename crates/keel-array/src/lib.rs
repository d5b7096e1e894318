//! Allocator-backed resizable array for keel consumers.
//!
//! [`DynamicArray`] is a contiguous buffer whose memory comes exclusively
//! from the [`Allocator`](keel_alloc::Allocator) named in its
//! [`ArrayOptions`]. Element copies, disposal and ordering go through an
//! [`ElementOps`] bundle, so containers holding resources with custom
//! copy or teardown semantics work without special cases.
//!
//! ```text
//! ArrayOptions (borrowed, outlives every array built from it)
//! ├── &Allocator      every buffer is requested and released here
//! └── ElementOps      copy / dispose / compare
//!
//! DynamicArray
//! └── RawBuf          reserved slots, the first `len` of them live
//! ```
//!
//! Growth is never implicit: [`append`](DynamicArray::append) fails once
//! the reserve is full and the caller decides when to
//! [`grow`](DynamicArray::grow).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod options;
mod raw;
pub mod search;
mod sort;

pub use array::DynamicArray;
pub use keel_core::ArrayError;
pub use options::{ArrayOptions, CustomOps, DefaultOps, ElementOps};
