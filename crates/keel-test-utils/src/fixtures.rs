//! Element fixtures for container tests.
//!
//! [`Tracked`] values report every copy and drop to a shared [`Ledger`],
//! so a test can check that a container disposed each element it created
//! exactly once.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use itertools::Itertools;

/// Shared counters for [`Tracked`] values.
#[derive(Default)]
pub struct Ledger {
    created: Cell<usize>,
    copies: Cell<usize>,
    drops: Cell<usize>,
}

impl Ledger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create a tracked value with tag 0.
    pub fn make(self: &Rc<Self>, value: i32) -> Tracked {
        self.make_tagged(value, 0)
    }

    /// Create a tracked value with an explicit tag. Tags do not take part
    /// in comparisons.
    pub fn make_tagged(self: &Rc<Self>, value: i32, tag: u32) -> Tracked {
        self.created.set(self.created.get() + 1);
        Tracked {
            value,
            tag,
            ledger: Rc::clone(self),
        }
    }

    /// Values created through `make` plus clones.
    pub fn created(&self) -> usize {
        self.created.get() + self.copies.get()
    }

    pub fn copies(&self) -> usize {
        self.copies.get()
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    /// Values created and not yet dropped.
    pub fn live(&self) -> usize {
        self.created() - self.drops()
    }
}

/// An `i32` that records its copies and drops.
pub struct Tracked {
    pub value: i32,
    pub tag: u32,
    ledger: Rc<Ledger>,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.ledger.copies.set(self.ledger.copies.get() + 1);
        Tracked {
            value: self.value,
            tag: self.tag,
            ledger: Rc::clone(&self.ledger),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.drops.set(self.ledger.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({}#{})", self.value, self.tag)
    }
}

/// Every permutation of `1..=k`, in lexicographic order.
pub fn permutations(k: u32) -> Vec<Vec<u32>> {
    (1..=k).permutations(k as usize).collect()
}
