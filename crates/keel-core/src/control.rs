//! Backend-specific control keys for allocators.

use std::fmt;

/// A request routed through an allocator's control slot.
///
/// Control keys let specialised backends expose extra operations (reset,
/// introspection) without widening the allocate/release/reallocate
/// contract. A backend answers `AllocError::InvalidKey` for every key it
/// does not recognise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// Rewind an arena's bump pointer to zero. Every block handed out
    /// before the reset is logically invalid afterwards.
    Reset,
    /// Bytes consumed so far, including alignment padding.
    Used,
    /// Usable bytes managed by the backend.
    Capacity,
    /// A key defined by a third-party backend.
    Vendor(u32),
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::Used => write!(f, "used"),
            Self::Capacity => write!(f, "capacity"),
            Self::Vendor(id) => write!(f, "vendor({id})"),
        }
    }
}
