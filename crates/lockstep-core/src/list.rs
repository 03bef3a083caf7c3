#![forbid(unsafe_code)]

//! The synchronized container: an item column and a view column that mutate
//! in lock step.
//!
//! # Design
//!
//! [`RenderList<T, V>`] owns two index-aligned columns: raw items
//! (`Vec<Option<T>>`) and derived view nodes
//! (`Vec<Option<Rc<ViewNode<V>>>>`). Every mutation enters through one of
//! the typed operations below; there is no other way to touch either column.
//! Each operation plans against the active [`Flavor`] first, builds any new
//! nodes through the [`Binding`] second, and only then edits the columns, so
//! a rejection or a panicking factory commits nothing.
//!
//! `Option` models vacant slots: a positional delete leaves a hole without
//! shrinking the collection, and a positional write past the end grows both
//! columns with holes up to the written index. [`render`](RenderList::render)
//! compacts holes away, so the rendering layer only ever sees occupied nodes.
//!
//! # Invariants
//!
//! 1. After every public call, both columns have identical length, and slot
//!    `i` is vacant in one column iff it is vacant in the other.
//! 2. A node is built exactly once per incoming item; reorders and removals
//!    move nodes, they never rebuild them.
//! 3. Every mutating call marks the container dirty exactly once, including
//!    structural no-ops (empty batches, out-of-range deletes); only a
//!    successful `render()` clears the mark.
//! 4. A rejected mutation ([`MutationError`]) leaves the columns and the
//!    dirty mark exactly as they were.
//! 5. The generation counter increases by exactly 1 per dirty `render()` and
//!    never otherwise.
//!
//! # Failure Modes
//!
//! - **Flavor rejection**: returned as `Err`; nothing was committed.
//! - **Factory, key function, or comparator panic**: the panic propagates;
//!   the columns and dirty mark are untouched because caller code only runs
//!   before the commit phase.
//!
//! # Example
//!
//! ```
//! use lockstep_core::{Binding, Key, RenderList};
//!
//! let binding = Binding::new(|n: &i64| format!("#{n}"), |n: &i64| Key::Int(*n));
//! let mut list = RenderList::new(binding);
//!
//! list.push(1)?;
//! list.push(2)?;
//! let frame = list.render();
//! assert_eq!(frame.generation(), 1);
//! assert_eq!(frame.len(), 2);
//!
//! // Nothing changed: same frame, same generation.
//! assert!(list.render().same(&frame));
//! # Ok::<(), lockstep_core::MutationError>(())
//! ```

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::binding::Binding;
use crate::error::{BuildError, MutationError};
use crate::flavor::{End, Flavor, Plain, PushPlan};
use crate::frame::{ViewFrame, ViewNode};
use crate::key::Key;
use crate::registry::{FlavorId, FlavorRegistry};

// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

// ─── Construction options ────────────────────────────────────────────────────

/// Construction-time configuration for [`RenderList::create`].
///
/// Only the binding is required. `count` and `external_wrap` are recognized
/// and stored but have no behavioral effect; they are reserved hints kept
/// for configuration compatibility.
pub struct ListOptions<T, V> {
    binding: Binding<T, V>,
    flavor: FlavorId,
    count: Option<usize>,
    external_wrap: bool,
}

impl<T, V> ListOptions<T, V> {
    /// Options with the plain flavor and no hints.
    #[must_use]
    pub fn new(binding: Binding<T, V>) -> Self {
        Self {
            binding,
            flavor: FlavorId::PLAIN,
            count: None,
            external_wrap: true,
        }
    }

    /// Resolve the container's flavor through the registry at build time.
    #[must_use]
    pub fn with_flavor(mut self, id: FlavorId) -> Self {
        self.flavor = id;
        self
    }

    /// Reserved bounded-materialization hint. Stored, never consulted.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Reserved wrapping hint. Stored, never consulted.
    #[must_use]
    pub fn with_external_wrap(mut self, wrap: bool) -> Self {
        self.external_wrap = wrap;
        self
    }
}

impl<T, V> fmt::Debug for ListOptions<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOptions")
            .field("flavor", &self.flavor)
            .field("count", &self.count)
            .field("external_wrap", &self.external_wrap)
            .finish_non_exhaustive()
    }
}

// ─── Dirty guard ─────────────────────────────────────────────────────────────

/// Marks the flag on scope exit. Installed at the start of every commit
/// phase so "committed implies dirty" holds on every exit path.
struct DirtyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for DirtyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(true);
    }
}

// ─── RenderList ──────────────────────────────────────────────────────────────

/// Item collection and view cache under one identity, mutating in lock step.
pub struct RenderList<T, V> {
    items: Vec<Option<T>>,
    views: Vec<Option<Rc<ViewNode<V>>>>,
    binding: Binding<T, V>,
    flavor: Rc<dyn Flavor>,
    dirty: Cell<bool>,
    frame: ViewFrame<V>,
    count_hint: Option<usize>,
    external_wrap: bool,
}

impl<T, V> RenderList<T, V> {
    /// An empty plain-flavored container. Infallible: the plain flavor needs
    /// no registry.
    #[must_use]
    pub fn new(binding: Binding<T, V>) -> Self {
        Self::with_flavor(binding, Plain)
    }

    /// An empty container with an explicit flavor instance, bypassing the
    /// registry.
    #[must_use]
    pub fn with_flavor(binding: Binding<T, V>, flavor: impl Flavor + 'static) -> Self {
        Self::assemble(binding, Rc::new(flavor), None, true)
    }

    /// Build from [`ListOptions`], resolving the flavor id through
    /// `registry`.
    ///
    /// # Errors
    ///
    /// [`BuildError::UnknownFlavor`] when the id is not registered.
    pub fn create(
        options: ListOptions<T, V>,
        registry: &FlavorRegistry,
    ) -> Result<Self, BuildError> {
        let flavor = registry
            .get(options.flavor)
            .ok_or(BuildError::UnknownFlavor(options.flavor))?;
        Ok(Self::assemble(
            options.binding,
            flavor,
            options.count,
            options.external_wrap,
        ))
    }

    fn assemble(
        binding: Binding<T, V>,
        flavor: Rc<dyn Flavor>,
        count_hint: Option<usize>,
        external_wrap: bool,
    ) -> Self {
        Self {
            items: Vec::new(),
            views: Vec::new(),
            binding,
            flavor,
            dirty: Cell::new(false),
            frame: ViewFrame::initial(),
            count_hint,
            external_wrap,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Number of slots, vacant ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no slots at all. A list of only vacant slots is
    /// not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }

    /// The item at `index`. Vacant and out-of-range both read as `None`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).and_then(Option::as_ref)
    }

    /// Iterate every slot in order, vacant ones as `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> {
        self.items.iter().map(Option::as_ref)
    }

    /// The key frozen into the view node at `index`, if the slot is
    /// occupied.
    #[must_use]
    pub fn node_key(&self, index: usize) -> Option<&Key> {
        self.views
            .get(index)
            .and_then(Option::as_ref)
            .map(|node| node.key())
    }

    /// Index of the first occupied slot whose node carries `key`.
    ///
    /// Searches the frozen node keys, so it matches what a rendering layer
    /// reconciles by, even if the item has since been edited in ways the key
    /// function would see differently.
    #[must_use]
    pub fn position_by_key(&self, key: &Key) -> Option<usize> {
        self.views
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|node| node.key() == key))
    }

    /// Whether a mutation since the last `render()` is pending
    /// materialization.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Generation of the last materialized frame. 0 until the first dirty
    /// `render()`.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.frame.generation()
    }

    /// Id of the flavor this container was built with.
    #[must_use]
    pub fn flavor_id(&self) -> FlavorId {
        self.flavor.id()
    }

    /// The reserved `count` hint, if one was configured.
    #[must_use]
    pub fn count_hint(&self) -> Option<usize> {
        self.count_hint
    }

    /// The reserved wrapping hint.
    #[must_use]
    pub fn external_wrap(&self) -> bool {
        self.external_wrap
    }

    // ─── Positional operations ───────────────────────────────────────────────

    /// Write `item` into slot `index` in both columns.
    ///
    /// Exactly one new view node is produced. Writing past the end grows
    /// both columns with vacant slots up to `index`; writing into a vacant
    /// in-range slot fills it.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn set(&mut self, index: usize, item: T) -> Result<(), MutationError> {
        self.flavor.plan_set(self.items.len(), index)?;
        let node = self.binding.node_for(&item);
        let _dirty = DirtyGuard { flag: &self.dirty };
        if index >= self.items.len() {
            self.views.resize_with(index + 1, || None);
            self.items.resize_with(index + 1, || None);
        }
        self.views[index] = Some(node);
        self.items[index] = Some(item);
        Ok(())
    }

    /// Vacate slot `index` in both columns, preserving length.
    ///
    /// The vacated node disappears from the next frame; the slot itself
    /// stays. This asymmetry with [`splice`](Self::splice) is deliberate and
    /// load-bearing: positional deletes do not shift later indices. An
    /// out-of-range delete changes nothing structurally but still marks the
    /// container dirty.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn delete(&mut self, index: usize) -> Result<(), MutationError> {
        self.flavor.plan_delete(self.items.len(), index)?;
        let _dirty = DirtyGuard { flag: &self.dirty };
        if index < self.items.len() {
            self.views[index] = None;
            self.items[index] = None;
        }
        Ok(())
    }

    // ─── Append-class operations ─────────────────────────────────────────────

    /// Append one item at the back. Returns the resulting length.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn push(&mut self, item: T) -> Result<usize, MutationError> {
        self.append_batch(End::Back, vec![item])
    }

    /// Append a batch at the back, in order. Returns the resulting length.
    ///
    /// The batch is admitted, noded, and committed as one step: if any item
    /// is rejected, none land. An empty batch commits nothing but still
    /// marks the container dirty.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn push_all(&mut self, items: impl IntoIterator<Item = T>) -> Result<usize, MutationError> {
        self.append_batch(End::Back, items.into_iter().collect())
    }

    /// Prepend one item at the front. Returns the resulting length.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn unshift(&mut self, item: T) -> Result<usize, MutationError> {
        self.append_batch(End::Front, vec![item])
    }

    /// Prepend a batch, one item at a time. Returns the resulting length.
    ///
    /// Items are inserted at the front in call order, so the *last* item of
    /// the batch ends up frontmost: `unshift_all([a, b])` on `[x]` yields
    /// `[b, a, x]`.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn unshift_all(
        &mut self,
        items: impl IntoIterator<Item = T>,
    ) -> Result<usize, MutationError> {
        self.append_batch(End::Front, items.into_iter().collect())
    }

    fn append_batch(&mut self, end: End, incoming: Vec<T>) -> Result<usize, MutationError> {
        // Plan the whole batch against a simulated length before anything
        // commits: all-or-nothing.
        let mut plans: Vec<PushPlan> = Vec::with_capacity(incoming.len());
        let mut simulated = self.items.len();
        for _ in &incoming {
            let plan = self.flavor.plan_push(simulated, end)?;
            simulated = simulated - plan.evict.min(simulated) + 1;
            plans.push(plan);
        }

        // Build every node before either column is touched.
        let nodes: Vec<Rc<ViewNode<V>>> = incoming
            .iter()
            .map(|item| self.binding.node_for(item))
            .collect();

        let _dirty = DirtyGuard { flag: &self.dirty };
        for ((item, node), plan) in incoming.into_iter().zip(nodes).zip(plans) {
            let evict = plan.evict.min(self.items.len());
            for _ in 0..evict {
                match end {
                    End::Back => {
                        self.views.remove(0);
                        self.items.remove(0);
                    }
                    End::Front => {
                        self.views.pop();
                        self.items.pop();
                    }
                }
            }
            match end {
                End::Back => {
                    self.views.push(Some(node));
                    self.items.push(Some(item));
                }
                End::Front => {
                    self.views.insert(0, Some(node));
                    self.items.insert(0, Some(item));
                }
            }
        }
        Ok(self.items.len())
    }

    // ─── Splice-class operations ─────────────────────────────────────────────

    /// Remove and return the last slot's item. `None` when the list is
    /// empty or the last slot is vacant.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn pop(&mut self) -> Result<Option<T>, MutationError> {
        let len = self.items.len();
        self.flavor
            .plan_splice(len, len.saturating_sub(1), usize::from(len > 0), 0)?;
        let _dirty = DirtyGuard { flag: &self.dirty };
        self.views.pop();
        Ok(self.items.pop().flatten())
    }

    /// Remove and return the first slot's item. `None` when the list is
    /// empty or the first slot is vacant.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn shift(&mut self) -> Result<Option<T>, MutationError> {
        let len = self.items.len();
        self.flavor.plan_splice(len, 0, usize::from(len > 0), 0)?;
        let _dirty = DirtyGuard { flag: &self.dirty };
        if self.items.is_empty() {
            return Ok(None);
        }
        self.views.remove(0);
        Ok(self.items.remove(0))
    }

    /// Splice: remove up to `delete_count` slots at `start`, insert
    /// `inserts` there, in both columns. Returns the removed slots, vacant
    /// ones as `None`.
    ///
    /// `start` clamps to the length and `delete_count` clamps to the slots
    /// actually available, so any input is well-formed. Nodes for inserted
    /// items are built before the columns are touched; nodes already in
    /// place move without being rebuilt.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        inserts: Vec<T>,
    ) -> Result<Vec<Option<T>>, MutationError> {
        let len = self.items.len();
        let start = start.min(len);
        let remove = delete_count.min(len - start);
        self.flavor.plan_splice(len, start, remove, inserts.len())?;

        let nodes: Vec<Rc<ViewNode<V>>> = inserts
            .iter()
            .map(|item| self.binding.node_for(item))
            .collect();

        let _dirty = DirtyGuard { flag: &self.dirty };
        let _ = self
            .views
            .splice(start..start + remove, nodes.into_iter().map(Some));
        let removed: Vec<Option<T>> = self
            .items
            .splice(start..start + remove, inserts.into_iter().map(Some))
            .collect();
        Ok(removed)
    }

    /// Reverse both columns in place, vacant slots included. No node is
    /// rebuilt.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn reverse(&mut self) -> Result<(), MutationError> {
        self.flavor.plan_splice(self.items.len(), 0, 0, 0)?;
        let _dirty = DirtyGuard { flag: &self.dirty };
        self.views.reverse();
        self.items.reverse();
        Ok(())
    }

    // ─── Sort ────────────────────────────────────────────────────────────────

    /// Reorder both columns by one stable permutation computed from `cmp`
    /// over the items.
    ///
    /// Nodes travel with their items, so the columns cannot diverge and no
    /// node is rebuilt. Vacant slots sink to the end, keeping their count.
    ///
    /// # Errors
    ///
    /// Flavor rejection; nothing is committed.
    pub fn sort_by(
        &mut self,
        mut cmp: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<(), MutationError> {
        self.flavor.plan_sort(self.items.len())?;

        let mut order: Vec<usize> = (0..self.items.len()).collect();
        let items = &self.items;
        order.sort_by(|&a, &b| match (items[a].as_ref(), items[b].as_ref()) {
            (Some(x), Some(y)) => cmp(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let _dirty = DirtyGuard { flag: &self.dirty };
        let mut items: Vec<Option<T>> = Vec::with_capacity(order.len());
        let mut views: Vec<Option<Rc<ViewNode<V>>>> = Vec::with_capacity(order.len());
        for &src in &order {
            items.push(self.items[src].take());
            views.push(self.views[src].take());
        }
        self.items = items;
        self.views = views;
        Ok(())
    }

    // ─── Materializer ────────────────────────────────────────────────────────

    /// Materialize the current view column into a frame.
    ///
    /// Clean containers return the previous frame unchanged (same
    /// generation, same shared node sequence), making repeated renders free
    /// and reference-stable. Dirty containers compact the occupied nodes
    /// into a new frame, bump the generation by one, and clear the dirty
    /// mark. No node is recomputed either way.
    pub fn render(&mut self) -> ViewFrame<V> {
        if !self.dirty.get() {
            return self.frame.clone();
        }
        let nodes: Vec<Rc<ViewNode<V>>> = self.views.iter().flatten().map(Rc::clone).collect();
        let generation = self.frame.generation() + 1;
        trace!(
            generation,
            nodes = nodes.len(),
            "materializing view frame"
        );
        self.frame = ViewFrame::new(generation, nodes);
        self.dirty.set(false);
        self.frame.clone()
    }
}

impl<T, V> fmt::Debug for RenderList<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderList")
            .field("len", &self.items.len())
            .field("occupied", &self.occupied())
            .field("dirty", &self.dirty.get())
            .field("generation", &self.frame.generation())
            .field("flavor", &self.flavor.id())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
