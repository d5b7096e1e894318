//! Error types for the keel memory primitives.
//!
//! Organised by subsystem: [`AllocError`] for the allocator abstraction
//! and its backends, [`ArrayError`] for the dynamic array engine. Both map
//! onto the integer status table in [`KeelStatus`](crate::KeelStatus).

use std::error::Error;
use std::fmt;

use crate::control::ControlKey;

/// Errors from the allocator abstraction and its backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// A zero-byte allocation or reallocation was requested.
    ZeroSize,
    /// The backend could not satisfy the request.
    Exhausted {
        /// Number of bytes requested.
        requested: usize,
    },
    /// A size computation overflowed `usize`.
    SizeOverflow,
    /// The backend returned a block that does not meet the required
    /// alignment.
    Misaligned {
        /// Alignment that was required.
        align: usize,
    },
    /// The backend does not recognise the control key.
    InvalidKey {
        /// The rejected key.
        key: ControlKey,
    },
    /// The buffer handed to an arena cannot hold a single allocation.
    BufferTooSmall {
        /// Size of the supplied buffer in bytes.
        size: usize,
        /// Smallest accepted buffer size in bytes.
        minimum: usize,
    },
    /// An arena configuration failed validation.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize => write!(f, "zero-sized allocation requested"),
            Self::Exhausted { requested } => {
                write!(f, "allocator exhausted: requested {requested} bytes")
            }
            Self::SizeOverflow => write!(f, "allocation size overflows usize"),
            Self::Misaligned { align } => {
                write!(f, "allocator returned a block not aligned to {align} bytes")
            }
            Self::InvalidKey { key } => write!(f, "invalid control key: {key}"),
            Self::BufferTooSmall { size, minimum } => {
                write!(
                    f,
                    "arena buffer too small: {size} bytes, need at least {minimum} bytes"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for AllocError {}

/// Errors from the dynamic array engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The element type cannot be stored through the configured allocator
    /// (zero-sized, or aligned more strictly than the allocator guarantees).
    UnsupportedElement {
        /// `size_of` the element type.
        size: usize,
        /// `align_of` the element type.
        align: usize,
    },
    /// `init` was called with a reserve of zero.
    ZeroReserve,
    /// `init` was asked to pre-populate slots without a seed value.
    MissingSeed,
    /// `init` was asked to pre-populate more slots than it reserves.
    InstanceCountExceedsReserve {
        /// Requested number of pre-populated slots.
        instance_count: usize,
        /// Requested reserve.
        reserve: usize,
    },
    /// The initial buffer could not be allocated.
    InitAllocationFailed {
        /// The underlying allocator failure.
        source: AllocError,
    },
    /// `append` found every reserved slot occupied.
    NoReserve {
        /// Current capacity in elements.
        reserved: usize,
    },
    /// `grow` was asked for a capacity that is not strictly larger.
    ShrinkRejected {
        /// Requested capacity in elements.
        requested: usize,
        /// Current capacity in elements.
        reserved: usize,
    },
    /// The replacement buffer for `grow` could not be allocated.
    GrowAllocationFailed {
        /// The underlying allocator failure.
        source: AllocError,
    },
    /// `sort` was called on an array with no live elements.
    SortEmpty,
    /// A scratch or output buffer for `sort` could not be allocated.
    SortAllocationFailed {
        /// The underlying allocator failure.
        source: AllocError,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedElement { size, align } => {
                write!(f, "unsupported element type: size {size}, align {align}")
            }
            Self::ZeroReserve => write!(f, "reserve must be greater than zero"),
            Self::MissingSeed => write!(f, "pre-populated slots require a seed value"),
            Self::InstanceCountExceedsReserve {
                instance_count,
                reserve,
            } => {
                write!(
                    f,
                    "instance count {instance_count} exceeds reserve {reserve}"
                )
            }
            Self::InitAllocationFailed { source } => {
                write!(f, "init allocation failed: {source}")
            }
            Self::NoReserve { reserved } => {
                write!(f, "no reserve left: all {reserved} slots occupied")
            }
            Self::ShrinkRejected {
                requested,
                reserved,
            } => {
                write!(
                    f,
                    "grow to {requested} rejected: reserve is already {reserved}"
                )
            }
            Self::GrowAllocationFailed { source } => {
                write!(f, "grow allocation failed: {source}")
            }
            Self::SortEmpty => write!(f, "cannot sort an empty array"),
            Self::SortAllocationFailed { source } => {
                write!(f, "sort allocation failed: {source}")
            }
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InitAllocationFailed { source }
            | Self::GrowAllocationFailed { source }
            | Self::SortAllocationFailed { source } => Some(source),
            _ => None,
        }
    }
}
