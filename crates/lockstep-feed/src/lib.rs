#![forbid(unsafe_code)]

//! Feed glue around [`lockstep_core`]: the collaborator boundary a paginated
//! list application lives behind.
//!
//! Nothing here is required by the core. This crate packages the pieces that
//! sit *around* a [`RenderList`](lockstep_core::RenderList) in a typical
//! infinite-scroll feed:
//!
//! - [`PageSource`]: the fetch seam. One synchronous method, one page per
//!   call; real transports (HTTP, IPC, fixtures) live behind it.
//! - [`IdSequence`]: stable keys for freshly fetched items, assigned before
//!   insertion so reconciliation identity never depends on server payloads.
//! - [`FeedPager`]: the pagination cursor plus the load driver. Owns the
//!   loading/exhausted guards and the success/failure bookkeeping; fetch
//!   failures stop here and never reach the container.
//! - [`ToastQueue`]: a tick-driven staged toast lifecycle for the load
//!   notifications, stepped by the host render loop rather than timers.

pub mod pager;
pub mod sequence;
pub mod source;
pub mod toast;

pub use pager::{FeedPager, LoadOutcome};
pub use sequence::IdSequence;
pub use source::{FetchError, Page, PageInfo, PageRequest, PageSource};
pub use toast::{Toast, ToastId, ToastKind, ToastPhase, ToastQueue, ToastRequest};
