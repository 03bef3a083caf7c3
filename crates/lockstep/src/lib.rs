#![forbid(unsafe_code)]

//! Lockstep public facade crate.
//!
//! Re-exports the core container ([`lockstep_core`]) and, behind the
//! default-on `feed` feature, the paginated-feed glue ([`lockstep_feed`]).

pub use lockstep_core as core;
#[cfg(feature = "feed")]
pub use lockstep_feed as feed;

pub mod prelude {
    pub use lockstep_core::{
        Binding, Bounded, CellId, ContextCell, ContextReader, Flavor, FlavorId, FlavorRegistry,
        Key, ListOptions, Merge, MutationError, Plain, RenderList, Ring, ViewFrame, ViewNode,
    };

    #[cfg(feature = "feed")]
    pub use lockstep_feed::{
        FeedPager, FetchError, IdSequence, LoadOutcome, Page, PageInfo, PageRequest, PageSource,
        ToastQueue, ToastRequest,
    };
}
