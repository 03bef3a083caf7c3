#![forbid(unsafe_code)]

//! Materialized output: keyed view nodes and generation-stamped frames.
//!
//! # Design
//!
//! A [`ViewNode`] is built exactly once per incoming item and never mutated.
//! Nodes are shared as `Rc<ViewNode<V>>` so "this node did not change" is
//! observable as pointer equality across frames.
//!
//! A [`ViewFrame`] is what [`render()`](crate::list::RenderList::render)
//! hands to the rendering layer: a compacted, ordered node sequence stamped
//! with the generation that produced it. Cloning a frame clones two `Rc`s.
//!
//! # Invariants
//!
//! 1. A frame's node sequence contains no vacant slots (compaction happens
//!    at materialization).
//! 2. Two frames from the same materialization are [`same`](ViewFrame::same);
//!    frames from different materializations never are, even when their node
//!    sequences are element-wise identical.
//! 3. Generation 0 is the empty frame every container starts with.

use std::fmt;
use std::rc::Rc;

use crate::key::Key;

/// One derived view artifact, frozen together with the key that identifies it.
pub struct ViewNode<V> {
    key: Key,
    view: V,
}

impl<V> ViewNode<V> {
    pub(crate) fn new(key: Key, view: V) -> Self {
        Self { key, view }
    }

    /// Reconciliation identity of this node.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The derived view artifact.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }
}

impl<V: fmt::Debug> fmt::Debug for ViewNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("key", &self.key)
            .field("view", &self.view)
            .finish()
    }
}

/// A compacted snapshot of the view column, stamped with its generation.
///
/// Frames are cheap to clone and safe to hold across later mutations: a held
/// frame never changes, it only goes stale.
pub struct ViewFrame<V> {
    generation: u64,
    nodes: Rc<[Rc<ViewNode<V>>]>,
}

impl<V> Clone for ViewFrame<V> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            nodes: Rc::clone(&self.nodes),
        }
    }
}

impl<V> ViewFrame<V> {
    /// The frame a fresh container starts with: generation 0, no nodes.
    pub(crate) fn initial() -> Self {
        Self {
            generation: 0,
            nodes: Rc::from(Vec::new()),
        }
    }

    pub(crate) fn new(generation: u64, nodes: Vec<Rc<ViewNode<V>>>) -> Self {
        Self {
            generation,
            nodes: Rc::from(nodes),
        }
    }

    /// Generation of the materialization that produced this frame.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of nodes in the frame. Vacant slots are already compacted away.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the frame holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index` within the frame, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Rc<ViewNode<V>>> {
        self.nodes.get(index)
    }

    /// The ordered node sequence.
    #[must_use]
    pub fn nodes(&self) -> &[Rc<ViewNode<V>>] {
        &self.nodes
    }

    /// Iterate the nodes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<ViewNode<V>>> {
        self.nodes.iter()
    }

    /// Whether `self` and `other` came out of the same materialization.
    ///
    /// This is the "nothing changed" signal for render layers: a clean
    /// `render()` returns a frame `same` as the previous one.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        self.generation == other.generation && Rc::ptr_eq(&self.nodes, &other.nodes)
    }
}

impl<V: fmt::Debug> fmt::Debug for ViewFrame<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFrame")
            .field("generation", &self.generation)
            .field("len", &self.nodes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
