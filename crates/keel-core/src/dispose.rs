//! Explicit teardown for owned structures.
//!
//! Every keel structure also tears itself down in `Drop`, so disposing is
//! only needed when the caller wants the release to happen at a precise
//! point. Because [`Dispose::dispose`] consumes the value, disposing the
//! same instance twice does not type-check.

/// A structure that can be torn down through one generic call.
pub trait Dispose {
    /// Release every resource owned by `self`.
    ///
    /// This is the last operation performed on the value.
    fn dispose(self);
}

/// Tear down any [`Dispose`] implementor.
pub fn dispose<D: Dispose>(value: D) {
    value.dispose();
}
