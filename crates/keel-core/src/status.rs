//! C-compatible status codes.
//!
//! [`KeelStatus`] is a `repr(i32)` enum covering every failure the
//! allocator and array layers report. Conversions from [`AllocError`] and
//! [`ArrayError`] are provided for embedders that need integer codes.

use crate::error::{AllocError, ArrayError};

/// C-compatible status code.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeelStatus {
    /// Success.
    Ok = 0,
    /// An argument is zero, out of range, or otherwise invalid.
    InvalidArgument = -1,
    /// The allocator could not satisfy a request.
    AllocationFailed = -2,
    /// The allocator does not recognise the control key.
    InvalidKey = -3,
    /// The buffer handed to an arena is too small.
    BufferTooSmall = -4,
    /// The array's initial buffer could not be allocated.
    InitAllocationFailed = -5,
    /// Every reserved slot of the array is occupied.
    NoReserve = -6,
    /// The array's replacement buffer could not be allocated.
    GrowAllocationFailed = -7,
    /// Sorting was requested on an array that cannot be sorted.
    SortGeneral = -8,
    /// A sort scratch buffer could not be allocated.
    SortAllocationFailed = -9,
    /// The element type is not storable through the allocator.
    UnsupportedElement = -10,
}

impl KeelStatus {
    /// Raw integer value of this status.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether this status denotes success.
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl From<&AllocError> for KeelStatus {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::ZeroSize | AllocError::SizeOverflow | AllocError::InvalidConfig { .. } => {
                KeelStatus::InvalidArgument
            }
            AllocError::Exhausted { .. } | AllocError::Misaligned { .. } => {
                KeelStatus::AllocationFailed
            }
            AllocError::InvalidKey { .. } => KeelStatus::InvalidKey,
            AllocError::BufferTooSmall { .. } => KeelStatus::BufferTooSmall,
        }
    }
}

impl From<&ArrayError> for KeelStatus {
    fn from(e: &ArrayError) -> Self {
        match e {
            ArrayError::UnsupportedElement { .. } => KeelStatus::UnsupportedElement,
            ArrayError::ZeroReserve
            | ArrayError::MissingSeed
            | ArrayError::InstanceCountExceedsReserve { .. }
            | ArrayError::ShrinkRejected { .. } => KeelStatus::InvalidArgument,
            ArrayError::InitAllocationFailed { .. } => KeelStatus::InitAllocationFailed,
            ArrayError::NoReserve { .. } => KeelStatus::NoReserve,
            ArrayError::GrowAllocationFailed { .. } => KeelStatus::GrowAllocationFailed,
            ArrayError::SortEmpty => KeelStatus::SortGeneral,
            ArrayError::SortAllocationFailed { .. } => KeelStatus::SortAllocationFailed,
        }
    }
}

impl From<Result<(), ArrayError>> for KeelStatus {
    fn from(r: Result<(), ArrayError>) -> Self {
        match r {
            Ok(()) => KeelStatus::Ok,
            Err(e) => KeelStatus::from(&e),
        }
    }
}

impl From<Result<(), AllocError>> for KeelStatus {
    fn from(r: Result<(), AllocError>) -> Self {
        match r {
            Ok(()) => KeelStatus::Ok,
            Err(e) => KeelStatus::from(&e),
        }
    }
}
