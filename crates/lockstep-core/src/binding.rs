#![forbid(unsafe_code)]

//! The item → view transform attached to a container at construction.
//!
//! A [`Binding`] pairs the view factory with the key function. Both run
//! exactly once per incoming item, at the moment the item enters the
//! container; neither is ever re-run for an item already inside.
//!
//! The key function must be pure over an item's stable fields. The factory
//! may be arbitrarily expensive; the whole point of the container is to call
//! it as rarely as possible.

use std::fmt;
use std::rc::Rc;

use crate::frame::ViewNode;
use crate::key::Key;

/// View factory plus key function for one container.
pub struct Binding<T, V> {
    factory: Box<dyn Fn(&T) -> V>,
    key_fn: Box<dyn Fn(&T) -> Key>,
}

impl<T, V> Binding<T, V> {
    /// Create a binding from a view factory and a key function.
    pub fn new(
        factory: impl Fn(&T) -> V + 'static,
        key_fn: impl Fn(&T) -> Key + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            key_fn: Box::new(key_fn),
        }
    }

    /// Extract the reconciliation key for `item`.
    #[must_use]
    pub fn key_of(&self, item: &T) -> Key {
        (self.key_fn)(item)
    }

    /// Run the factory alone. Prefer [`node_for`](Self::node_for) when the
    /// result is going to live in a container.
    #[must_use]
    pub fn view_of(&self, item: &T) -> V {
        (self.factory)(item)
    }

    /// Build the keyed node for one item.
    #[must_use]
    pub fn node_for(&self, item: &T) -> Rc<ViewNode<V>> {
        Rc::new(ViewNode::new((self.key_fn)(item), (self.factory)(item)))
    }
}

impl<T, V> fmt::Debug for Binding<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
