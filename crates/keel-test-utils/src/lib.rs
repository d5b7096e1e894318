//! Test utilities and mock types for keel development.
//!
//! Provides allocator doubles ([`FailingAllocator`],
//! [`CountingAllocator`]), a drop-tracking element type ([`Tracked`]) and
//! permutation helpers for exhaustive sort checks.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod fixtures;

pub use alloc::{CountingAllocator, FailingAllocator};
pub use fixtures::{permutations, Ledger, Tracked};
