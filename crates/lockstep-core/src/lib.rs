#![forbid(unsafe_code)]

//! Keyed reactive collections for retained-mode render loops.
//!
//! The core primitive is [`RenderList`]: a raw item collection and a cache
//! of derived, keyed view nodes held under one identity and mutated in lock
//! step through a closed operation set. Expensive view construction runs
//! exactly once per incoming item; a dirty flag and generation counter let
//! the rendering layer skip materialization entirely when nothing changed.
//!
//! Around it:
//!
//! - [`Binding`]: the item → view factory plus key function attached at
//!   construction.
//! - [`Flavor`] and [`FlavorRegistry`]: pluggable admission policy
//!   (growable, bounded, ring) resolved by id at build time.
//! - [`ViewFrame`]: the compacted, generation-stamped snapshot `render()`
//!   hands out; cheap to clone, pointer-comparable.
//! - [`ContextCell`]: an identity-stable cell whose payload merges in
//!   place, for values that deep consumers read without invalidating on
//!   every change.
//!
//! Everything here is single-threaded and cooperative; drive it from your
//! render loop.

pub mod binding;
pub mod cell;
pub mod error;
pub mod flavor;
pub mod frame;
pub mod key;
pub mod list;
pub mod logging;
pub mod registry;

pub use binding::Binding;
pub use cell::{CellId, ContextCell, ContextReader, Merge};
pub use error::{BuildError, FlavorError, MutationError};
pub use flavor::{Bounded, End, Flavor, Plain, PushPlan, Ring};
pub use frame::{ViewFrame, ViewNode};
pub use key::Key;
pub use list::{ListOptions, RenderList};
pub use registry::{FlavorId, FlavorRegistry};
