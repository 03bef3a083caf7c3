#![forbid(unsafe_code)]

//! Identity-stable mutable context cells.
//!
//! # Design
//!
//! A [`ContextCell`] holds a payload that downstream consumers read through
//! cloned [`ContextReader`] handles. The cell's identity — what
//! identity-keyed caches key on — is fixed at construction and survives
//! every update, because [`provide`](ContextCell::provide) merges the new
//! payload *into* the existing one (shallow, field-by-field via [`Merge`])
//! instead of replacing it. Consumers holding a reader always observe the
//! latest merged payload without any reference ever changing hands.
//!
//! Single writer, many readers, by type: `ContextCell` is not `Clone`;
//! `ContextReader` is.
//!
//! # Invariants
//!
//! 1. `id()` never changes for the lifetime of a cell, and every reader of
//!    the cell reports the same id.
//! 2. After `provide(patch)` returns, every reader observes the merged
//!    payload.
//! 3. The provide counter increments by exactly 1 per `provide` call.
//!
//! # Failure Modes
//!
//! - **Re-entrant access**: a reader closure that calls `provide` on the
//!   same cell panics (`RefCell` discipline). Readers are meant to copy what
//!   they need out and return.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

// ─── Cell ID generation ──────────────────────────────────────────────────────

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

fn next_cell_id() -> u64 {
    NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Stable identity of a cell, shared by its writer and all its readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

// ─── Merge ───────────────────────────────────────────────────────────────────

/// Shallow in-place merge: fields present in `newer` overwrite, the rest
/// keep their current value.
///
/// Payload types implement this field by field. For optional fields,
/// delegate to the provided `Option` impl: `Some` wins, `None` keeps.
pub trait Merge {
    fn merge_from(&mut self, newer: Self);
}

impl<T> Merge for Option<T> {
    fn merge_from(&mut self, newer: Self) {
        if newer.is_some() {
            *self = newer;
        }
    }
}

// ─── Cell internals ──────────────────────────────────────────────────────────

struct CellInner<P> {
    id: CellId,
    payload: RefCell<P>,
    provides: Cell<u64>,
}

/// The unique writer half of a context cell.
///
/// Not `Clone`: one writer per cell, enforced by the type system. Hand out
/// [`reader()`](ContextCell::reader) handles to consumers.
pub struct ContextCell<P> {
    inner: Rc<CellInner<P>>,
}

/// A cloneable read handle observing the cell's latest merged payload.
pub struct ContextReader<P> {
    inner: Rc<CellInner<P>>,
}

impl<P> Clone for ContextReader<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P> ContextCell<P> {
    /// A new cell with a fresh identity and `initial` payload.
    #[must_use]
    pub fn new(initial: P) -> Self {
        Self {
            inner: Rc::new(CellInner {
                id: CellId(next_cell_id()),
                payload: RefCell::new(initial),
                provides: Cell::new(0),
            }),
        }
    }

    /// A new read handle. Cloning readers is the propagation mechanism:
    /// pass them down as far as needed.
    #[must_use]
    pub fn reader(&self) -> ContextReader<P> {
        ContextReader {
            inner: Rc::clone(&self.inner),
        }
    }

    /// This cell's identity.
    #[must_use]
    pub fn id(&self) -> CellId {
        self.inner.id
    }

    /// How many times `provide` has run.
    #[must_use]
    pub fn provides(&self) -> u64 {
        self.inner.provides.get()
    }

    /// Read the payload through a closure.
    pub fn with<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.inner.payload.borrow())
    }
}

impl<P: Merge> ContextCell<P> {
    /// Merge `patch` into the payload in place. Identity is untouched;
    /// every reader observes the result immediately.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a read closure on the same cell.
    pub fn provide(&self, patch: P) {
        self.inner.payload.borrow_mut().merge_from(patch);
        self.inner.provides.set(self.inner.provides.get() + 1);
    }
}

impl<P: Clone> ContextCell<P> {
    /// Clone the current payload out.
    #[must_use]
    pub fn get(&self) -> P {
        self.inner.payload.borrow().clone()
    }
}

impl<P> ContextReader<P> {
    /// Identity of the cell this reader observes.
    #[must_use]
    pub fn id(&self) -> CellId {
        self.inner.id
    }

    /// Whether two readers observe the same cell.
    #[must_use]
    pub fn same(&self, other: &ContextReader<P>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// How many times the writer has provided.
    #[must_use]
    pub fn provides(&self) -> u64 {
        self.inner.provides.get()
    }

    /// Read the payload through a closure.
    pub fn with<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.inner.payload.borrow())
    }
}

impl<P: Clone> ContextReader<P> {
    /// Clone the current payload out.
    #[must_use]
    pub fn get(&self) -> P {
        self.inner.payload.borrow().clone()
    }
}

impl<P: fmt::Debug> fmt::Debug for ContextCell<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextCell")
            .field("id", &self.inner.id)
            .field("provides", &self.inner.provides.get())
            .field("payload", &self.inner.payload.borrow())
            .finish()
    }
}

impl<P: fmt::Debug> fmt::Debug for ContextReader<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextReader")
            .field("id", &self.inner.id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
