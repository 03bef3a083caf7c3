#![forbid(unsafe_code)]

//! The feed pager: pagination cursor plus load driver.
//!
//! [`FeedPager`] owns the client-side pagination cursor and the guards
//! around loading. One call to [`FeedPager::load_next`] performs a whole
//! load step: fetch the cursor's page, re-key the items, push them into the
//! container, merge the server's pagination echo, dispatch the outcome
//! toast, and advance or exhaust the cursor.
//!
//! The cursor is client-controlled: on success every field of the server's
//! [`PageInfo`] **except** `page` is merged in. The server's echoed page is
//! deliberately ignored — the client decides what it asks for next, so a
//! misbehaving backend cannot skip or replay pages on our behalf.
//!
//! Fetch failures are recovered here. The container never observes a failed
//! load; the failure becomes an error toast and a [`LoadOutcome::Failed`].

use lockstep_core::{Key, MutationError, RenderList};
use web_time::Duration;

use crate::sequence::IdSequence;
use crate::source::{FetchError, PageInfo, PageRequest, PageSource};
use crate::toast::{ToastQueue, ToastRequest};

/// Dwell for the post-load info toast.
const INFO_DWELL: Duration = Duration::from_millis(3000);
/// Dwell for the load-failure error toast.
const ERROR_DWELL: Duration = Duration::from_millis(10_000);

/// What one [`FeedPager::load_next`] call did.
#[derive(Debug)]
pub enum LoadOutcome {
    /// A page landed; `appended` items were pushed into the container.
    Loaded { appended: usize },
    /// A load is already in flight; nothing was done.
    AlreadyLoading,
    /// The cursor is exhausted (or capped); nothing was done.
    Exhausted,
    /// The fetch failed; an error toast was dispatched, the container was
    /// not touched.
    Failed(FetchError),
    /// The container's flavor refused the batch; an error toast was
    /// dispatched, nothing was committed.
    Rejected(MutationError),
}

/// Pagination cursor and load state for one infinite feed.
#[derive(Debug)]
pub struct FeedPager {
    cursor: PageInfo,
    loading: bool,
    has_next: bool,
    page_limit: Option<u32>,
    ids: IdSequence,
}

impl FeedPager {
    /// A pager at page 0 with the conventional starting cursor: one page
    /// assumed until the server says otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: PageInfo {
                page: 0,
                page_size: 3,
                pages_count: 1,
                total_count: 1,
            },
            loading: false,
            has_next: true,
            page_limit: None,
            ids: IdSequence::new(),
        }
    }

    /// Override the requested page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.cursor.page_size = page_size;
        self
    }

    /// Cap how many pages this pager will ever request, regardless of what
    /// the server reports. `load_next` past the cap is [`LoadOutcome::Exhausted`].
    #[must_use]
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// The current cursor.
    #[must_use]
    pub fn cursor(&self) -> &PageInfo {
        &self.cursor
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether another page remains to load.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// Hold or release the loading guard by hand.
    ///
    /// [`load_next`](Self::load_next) manages the guard itself; hosts whose
    /// transport completes out-of-band set it around their own fetch so a
    /// scroll trigger firing mid-flight skips instead of double-loading.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Perform one load step against `source`, pushing into `list` and
    /// reporting through `toasts`.
    ///
    /// `rekey` stamps each fetched item with its fresh [`Key`] before
    /// insertion; the container's key function must read back the same
    /// field.
    pub fn load_next<T, V, S>(
        &mut self,
        source: &mut S,
        list: &mut RenderList<T, V>,
        toasts: &mut ToastQueue,
        mut rekey: impl FnMut(&mut T, Key),
    ) -> LoadOutcome
    where
        S: PageSource<T>,
    {
        if self.loading {
            return LoadOutcome::AlreadyLoading;
        }
        if !self.has_next {
            return LoadOutcome::Exhausted;
        }

        self.loading = true;
        let request = PageRequest {
            page: self.cursor.page,
            page_size: self.cursor.page_size,
        };
        tracing::debug!(page = request.page, page_size = request.page_size, "fetching page");
        let page = match source.fetch_page(&request) {
            Ok(page) => page,
            Err(err) => {
                self.loading = false;
                tracing::warn!(page = request.page, error = %err, "page fetch failed");
                toasts.dispatch(ToastRequest::error(err.to_string(), ERROR_DWELL));
                return LoadOutcome::Failed(err);
            }
        };
        self.loading = false;

        let mut items = page.items;
        let appended = items.len();
        for item in &mut items {
            rekey(item, self.ids.next());
        }
        let len = match list.push_all(items) {
            Ok(len) => len,
            Err(err) => {
                tracing::warn!(page = request.page, error = %err, "container refused batch");
                toasts.dispatch(ToastRequest::error(err.to_string(), ERROR_DWELL));
                return LoadOutcome::Rejected(err);
            }
        };

        // Client-controlled cursor: take everything the server reports
        // except its echoed page.
        self.cursor.page_size = page.info.page_size;
        self.cursor.pages_count = page.info.pages_count;
        self.cursor.total_count = page.info.total_count;

        toasts.dispatch(ToastRequest::info(
            format!(
                "+{appended} (page {}; items {len} of {})",
                self.cursor.page, self.cursor.total_count
            ),
            INFO_DWELL,
        ));
        tracing::info!(
            appended,
            page = self.cursor.page,
            total = self.cursor.total_count,
            "page loaded"
        );

        match self.page_limit {
            Some(limit) if limit > self.cursor.page => self.cursor.page += 1,
            Some(_) => self.has_next = false,
            None if self.cursor.pages_count > self.cursor.page => self.cursor.page += 1,
            None => self.has_next = false,
        }

        LoadOutcome::Loaded { appended }
    }
}

impl Default for FeedPager {
    fn default() -> Self {
        Self::new()
    }
}
