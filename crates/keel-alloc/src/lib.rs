//! Pluggable allocation for keel containers.
//!
//! Containers never touch the global allocator directly; every byte they
//! own is requested through an [`Allocator`]. Two backends ship with the
//! crate:
//!
//! ```text
//! Allocator (trait: allocate / release / reallocate / query / control)
//! ├── HeapAllocator   pass-through to the Rust global allocator
//! └── BumpAllocator   aligned bump pointer over a caller-supplied buffer
//! ```
//!
//! The free functions [`allocate`], [`release`], [`reallocate`],
//! [`allocator_query`] and [`allocator_control`] validate their arguments
//! before forwarding to the backend, and supply the allocate+copy+release
//! fallback for backends without a native reallocate.
//!
//! [`allocator_control`] takes the allocator by `&mut`. Resetting an arena
//! therefore cannot compile while an array built on it is still alive.
//!
//! # Safety
//!
//! Releasing and reallocating take raw blocks and are `unsafe`: the block
//! must have been returned by the same allocator with the stated size.
//! Byte-level primitives live in the private `raw` module.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod allocator;
pub mod bump;
pub mod config;
pub mod heap;
mod raw;

pub use allocator::{allocate, allocator_control, allocator_query, reallocate, release, Allocator};
pub use bump::BumpAllocator;
pub use config::ArenaConfig;
pub use heap::HeapAllocator;
pub use keel_core::{AllocError, ControlKey};

/// Alignment guaranteed by the built-in backends unless configured
/// otherwise.
pub const MAX_ALIGN: usize = 16;
