#![forbid(unsafe_code)]

//! Flavor ids and the startup registry that resolves them.
//!
//! The registry is an explicit object created once at startup and passed by
//! reference to [`RenderList::create`](crate::list::RenderList::create); there
//! is no process-global table, so construction order between modules never
//! matters. Registration is last-writer-wins per id: re-registering the same
//! id silently replaces the previous flavor, which makes idempotent startup
//! wiring safe to run twice.

use std::rc::Rc;

use ahash::AHashMap;

use crate::flavor::{Flavor, Plain};

// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

/// Interned identifier a flavor registers and resolves under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlavorId(&'static str);

impl FlavorId {
    /// The default growable sequence, pre-registered in every registry.
    pub const PLAIN: FlavorId = FlavorId::new("plain");
    /// Fixed-capacity sequence ([`Bounded`](crate::flavor::Bounded)).
    pub const BOUNDED: FlavorId = FlavorId::new("bounded");
    /// Evicting ring sequence ([`Ring`](crate::flavor::Ring)).
    pub const RING: FlavorId = FlavorId::new("ring");

    /// An id from a static name. Distinct names are distinct ids.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The underlying name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for FlavorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Startup table mapping [`FlavorId`]s to flavor instances.
///
/// A fresh registry already contains [`Plain`] under [`FlavorId::PLAIN`], so
/// default-flavored containers resolve without any registration at all.
pub struct FlavorRegistry {
    flavors: AHashMap<FlavorId, Rc<dyn Flavor>>,
}

impl FlavorRegistry {
    /// A registry with the plain flavor pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            flavors: AHashMap::new(),
        };
        registry.register(Plain);
        registry
    }

    /// Register `flavor` under its own id, replacing any previous holder.
    ///
    /// Returns the flavor that was displaced, if any. Last writer wins by
    /// construction; replacement is silent.
    pub fn register(&mut self, flavor: impl Flavor + 'static) -> Option<Rc<dyn Flavor>> {
        self.register_rc(Rc::new(flavor))
    }

    /// Register an already-shared flavor instance.
    pub fn register_rc(&mut self, flavor: Rc<dyn Flavor>) -> Option<Rc<dyn Flavor>> {
        let id = flavor.id();
        let displaced = self.flavors.insert(id, flavor);
        if displaced.is_some() {
            debug!(flavor = %id, "flavor re-registered, last writer wins");
        }
        displaced
    }

    /// Resolve `id` to a registered flavor.
    #[must_use]
    pub fn get(&self, id: FlavorId) -> Option<Rc<dyn Flavor>> {
        self.flavors.get(&id).map(Rc::clone)
    }

    /// Whether `id` resolves.
    #[must_use]
    pub fn contains(&self, id: FlavorId) -> bool {
        self.flavors.contains_key(&id)
    }

    /// Number of registered flavors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flavors.len()
    }

    /// A registry is never empty; `Plain` is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty()
    }

    /// The registered ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = FlavorId> {
        self.flavors.keys().copied()
    }
}

impl Default for FlavorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlavorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&'static str> = self.flavors.keys().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        f.debug_struct("FlavorRegistry").field("ids", &ids).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::{Bounded, Ring};

    #[test]
    fn plain_is_preregistered() {
        let registry = FlavorRegistry::new();
        assert!(registry.contains(FlavorId::PLAIN));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert_eq!(
            registry.get(FlavorId::PLAIN).map(|flavor| flavor.id()),
            Some(FlavorId::PLAIN)
        );
    }

    #[test]
    fn unknown_id_does_not_resolve() {
        let registry = FlavorRegistry::new();
        assert!(registry.get(FlavorId::new("nope")).is_none());
        assert!(!registry.contains(FlavorId::RING));
    }

    #[test]
    fn last_writer_wins() {
        let mut registry = FlavorRegistry::new();
        assert!(registry.register(Bounded::with_id(FlavorId::new("window"), 4)).is_none());

        let displaced = registry.register(Bounded::with_id(FlavorId::new("window"), 8));
        assert!(displaced.is_some(), "second registration displaces the first");
        assert_eq!(registry.len(), 2);

        // The resolved instance is the most recent one.
        let resolved = registry.get(FlavorId::new("window")).unwrap();
        assert!(resolved.plan_push(7, crate::flavor::End::Back).is_ok());
    }

    #[test]
    fn reregistration_is_idempotent_for_startup_wiring() {
        let mut registry = FlavorRegistry::new();
        for _ in 0..2 {
            registry.register(Ring::new(16));
            registry.register(Bounded::new(32));
        }
        assert_eq!(registry.len(), 3);
        assert!(registry.contains(FlavorId::RING));
        assert!(registry.contains(FlavorId::BOUNDED));
    }

    #[test]
    fn ids_enumerates_registrations() {
        let mut registry = FlavorRegistry::new();
        registry.register(Ring::new(2));
        let mut ids: Vec<&'static str> = registry.ids().map(FlavorId::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["plain", "ring"]);
    }

    #[test]
    fn debug_lists_ids() {
        let registry = FlavorRegistry::new();
        let debug = format!("{registry:?}");
        assert!(debug.contains("plain"));
    }
}
