#![forbid(unsafe_code)]

//! Collection flavors: pluggable admission policy for the mutation set.
//!
//! # Design
//!
//! A [`Flavor`] never touches the columns. For each operation class it gets a
//! *plan* call describing the edit about to happen and either admits it
//! (optionally demanding eviction, for ring behavior) or rejects it with a
//! [`FlavorError`]. The container owns every structural edit, so length
//! parity between the item and view columns holds for every flavor, and a
//! rejection always happens before anything is committed.
//!
//! Append and prepend batches are planned one item at a time against a
//! simulated length, so a ring that evicts per admission behaves the same
//! whether five items arrive in one call or five.
//!
//! # Invariants
//!
//! 1. Plan hooks are pure policy: same inputs, same answer, no side effects
//!    on the container.
//! 2. A returned [`PushPlan::evict`] never exceeds the current length the
//!    hook was given (the container clamps, but well-behaved flavors do not
//!    rely on that).
//! 3. Reorders that neither add nor remove slots (`reverse`) plan as an
//!    empty splice.

use crate::error::FlavorError;
use crate::registry::FlavorId;

/// Which end of the collection an append-class operation inserts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// `unshift`-style insertion before index 0.
    Front,
    /// `push`-style insertion after the last slot.
    Back,
}

impl End {
    /// The end opposite the insertion point, where evictions happen.
    #[must_use]
    pub fn opposite(self) -> End {
        match self {
            End::Front => End::Back,
            End::Back => End::Front,
        }
    }
}

/// Admission verdict for a single append-class item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushPlan {
    /// Slots to vacate from the end opposite the insertion, before the item
    /// lands. Evicted slots are removed outright (no holes left behind).
    pub evict: usize,
}

impl PushPlan {
    /// Admit without evicting anything.
    #[must_use]
    pub fn admit() -> Self {
        Self::default()
    }

    /// Admit after evicting `evict` slots from the opposite end.
    #[must_use]
    pub fn evicting(evict: usize) -> Self {
        Self { evict }
    }
}

/// Admission policy for one registered collection shape.
///
/// Every hook defaults to plain growable-sequence behavior: admit everything,
/// evict nothing. Implementors override only what their shape constrains.
pub trait Flavor {
    /// Identifier this flavor registers and resolves under.
    fn id(&self) -> FlavorId;

    /// A positional write at `index` into a collection of `len` slots.
    /// Writing past the end grows the collection to `index + 1` slots.
    fn plan_set(&self, _len: usize, _index: usize) -> Result<(), FlavorError> {
        Ok(())
    }

    /// A positional delete at `index`. Length is preserved; the slot is
    /// vacated.
    fn plan_delete(&self, _len: usize, _index: usize) -> Result<(), FlavorError> {
        Ok(())
    }

    /// One item arriving at `end` of a collection of `len` slots. Batches
    /// plan each item in turn with the length the prior admissions produce.
    fn plan_push(&self, _len: usize, _end: End) -> Result<PushPlan, FlavorError> {
        Ok(PushPlan::admit())
    }

    /// A splice-class edit: `remove` slots leaving at `start`, `insert`
    /// slots arriving there. `pop`, `shift`, and `reverse` plan through this
    /// hook too (`reverse` as an empty splice).
    fn plan_splice(
        &self,
        _len: usize,
        _start: usize,
        _remove: usize,
        _insert: usize,
    ) -> Result<(), FlavorError> {
        Ok(())
    }

    /// A comparator reorder over `len` slots.
    fn plan_sort(&self, _len: usize) -> Result<(), FlavorError> {
        Ok(())
    }
}

// ─── Built-in flavors ────────────────────────────────────────────────────────

/// The default growable sequence. Admits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Flavor for Plain {
    fn id(&self) -> FlavorId {
        FlavorId::PLAIN
    }
}

/// Fixed-capacity sequence: any edit that would grow past `capacity` is
/// rejected outright.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    id: FlavorId,
    capacity: usize,
}

impl Bounded {
    /// A bounded flavor under the default [`FlavorId::BOUNDED`] id.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_id(FlavorId::BOUNDED, capacity)
    }

    /// A bounded flavor registered under a caller-chosen id, for apps that
    /// need several capacities side by side.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_id(id: FlavorId, capacity: usize) -> Self {
        assert!(capacity > 0, "bounded flavor requires capacity >= 1");
        Self { id, capacity }
    }

    /// The fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn admit_len(&self, requested: usize) -> Result<(), FlavorError> {
        if requested > self.capacity {
            Err(FlavorError::CapacityExceeded {
                capacity: self.capacity,
                requested,
            })
        } else {
            Ok(())
        }
    }
}

impl Flavor for Bounded {
    fn id(&self) -> FlavorId {
        self.id
    }

    fn plan_set(&self, len: usize, index: usize) -> Result<(), FlavorError> {
        if index >= len {
            self.admit_len(index + 1)
        } else {
            Ok(())
        }
    }

    fn plan_push(&self, len: usize, _end: End) -> Result<PushPlan, FlavorError> {
        self.admit_len(len + 1).map(|()| PushPlan::admit())
    }

    fn plan_splice(
        &self,
        len: usize,
        _start: usize,
        remove: usize,
        insert: usize,
    ) -> Result<(), FlavorError> {
        self.admit_len(len.saturating_sub(remove) + insert)
    }
}

/// Ring sequence: a full ring admits new items by evicting from the end
/// opposite the insertion, so the newest `capacity` items survive.
///
/// Eviction applies to append-class operations only; a splice that would
/// grow past capacity is rejected like [`Bounded`].
#[derive(Debug, Clone, Copy)]
pub struct Ring {
    id: FlavorId,
    capacity: usize,
}

impl Ring {
    /// A ring flavor under the default [`FlavorId::RING`] id.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_id(FlavorId::RING, capacity)
    }

    /// A ring flavor registered under a caller-chosen id.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_id(id: FlavorId, capacity: usize) -> Self {
        assert!(capacity > 0, "ring flavor requires capacity >= 1");
        Self { id, capacity }
    }

    /// The fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Flavor for Ring {
    fn id(&self) -> FlavorId {
        self.id
    }

    fn plan_set(&self, _len: usize, index: usize) -> Result<(), FlavorError> {
        if index + 1 > self.capacity {
            Err(FlavorError::CapacityExceeded {
                capacity: self.capacity,
                requested: index + 1,
            })
        } else {
            Ok(())
        }
    }

    fn plan_push(&self, len: usize, _end: End) -> Result<PushPlan, FlavorError> {
        let evict = (len + 1).saturating_sub(self.capacity).min(len);
        Ok(PushPlan::evicting(evict))
    }

    fn plan_splice(
        &self,
        len: usize,
        _start: usize,
        remove: usize,
        insert: usize,
    ) -> Result<(), FlavorError> {
        let requested = len.saturating_sub(remove) + insert;
        if requested > self.capacity {
            Err(FlavorError::CapacityExceeded {
                capacity: self.capacity,
                requested,
            })
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
