//! Core types and traits for the keel memory primitives.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the error taxonomy shared by the allocator and container crates, the
//! C-compatible status codes those errors map onto, allocator control
//! keys, and the [`Dispose`] lifecycle trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod control;
pub mod dispose;
pub mod error;
pub mod status;

pub use control::ControlKey;
pub use dispose::{dispose, Dispose};
pub use error::{AllocError, ArrayError};
pub use status::KeelStatus;
