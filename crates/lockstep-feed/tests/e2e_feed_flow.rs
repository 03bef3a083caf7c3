//! End-to-end feed flow: a scripted page source driven through the pager
//! into a `RenderList`, with toast traffic stepped by a fake frame clock.
//!
//! Covers the full collaborator loop:
//!
//! 1. Multi-page happy path — cursor advancement, key assignment, toast
//!    text, exhaustion on the final page.
//! 2. A failing page — error toast, container untouched, pager retryable.
//! 3. Render generations across loads — one bump per landed page, none
//!    for skips or failures.
//! 4. Toast lifecycle under the stepped clock, including force-dismiss.

use lockstep_core::{Binding, Key, RenderList};
use lockstep_feed::{
    FeedPager, FetchError, LoadOutcome, Page, PageInfo, PageRequest, PageSource, ToastPhase,
    ToastQueue, ToastRequest,
};
use web_time::Duration;

// ═══════════════════════════════════════════════════════════════════════
// Fixture: a scripted review backend
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct Review {
    id: i64,
    author: String,
    rating: u8,
}

/// Three pages of two reviews each (pages past the end come back empty);
/// page 1 can be scripted to fail once.
struct ScriptedSource {
    fail_page: Option<u32>,
    fetches: u32,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            fail_page: None,
            fetches: 0,
        }
    }

    fn failing_on(page: u32) -> Self {
        Self {
            fail_page: Some(page),
            fetches: 0,
        }
    }
}

impl PageSource<Review> for ScriptedSource {
    fn fetch_page(&mut self, request: &PageRequest) -> Result<Page<Review>, FetchError> {
        self.fetches += 1;
        if self.fail_page == Some(request.page) {
            self.fail_page = None; // fail once, then recover
            return Err(FetchError::request("upstream timed out"));
        }
        let count = if request.page < 3 { 2 } else { 0 };
        let items = (0..count)
            .map(|i| Review {
                id: 0, // assigned by the pager's rekey
                author: format!("author {}-{i}", request.page),
                rating: 3 + (i as u8),
            })
            .collect();
        Ok(Page {
            items,
            info: PageInfo {
                page: request.page,
                page_size: request.page_size,
                pages_count: 3,
                total_count: 6,
            },
        })
    }
}

fn review_list() -> RenderList<Review, String> {
    RenderList::new(Binding::new(
        |r: &Review| format!("{} ({}★) #{}", r.author, r.rating, r.id),
        |r: &Review| Key::Int(r.id),
    ))
}

fn rekey(review: &mut Review, key: Key) {
    review.id = key.as_int().unwrap();
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ═══════════════════════════════════════════════════════════════════════
// Happy path
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn three_pages_then_exhaustion() {
    let mut source = ScriptedSource::new();
    let mut pager = FeedPager::new();
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    // Pages 0, 1, 2 land. The server reports pages_count 3, so the cursor
    // still advances past the last full page; exhaustion is discovered by
    // the empty page 3 fetch.
    for expected_page in 0..3u32 {
        assert_eq!(pager.cursor().page, expected_page);
        let outcome = pager.load_next(&mut source, &mut list, &mut toasts, rekey);
        assert!(matches!(outcome, LoadOutcome::Loaded { appended: 2 }));
    }
    assert!(pager.has_next());
    assert!(matches!(
        pager.load_next(&mut source, &mut list, &mut toasts, rekey),
        LoadOutcome::Loaded { appended: 0 }
    ));
    assert!(!pager.has_next());
    assert!(matches!(
        pager.load_next(&mut source, &mut list, &mut toasts, rekey),
        LoadOutcome::Exhausted
    ));
    assert_eq!(source.fetches, 4);

    // Six reviews, keyed 1..=6 in arrival order.
    assert_eq!(list.len(), 6);
    let keys: Vec<i64> = (0..6)
        .map(|i| list.node_key(i).unwrap().as_int().unwrap())
        .collect();
    assert_eq!(keys, vec![1, 2, 3, 4, 5, 6]);

    // One info toast per landed page (the empty final page included).
    let texts: Vec<&str> = toasts.iter().map(|t| t.text()).collect();
    assert_eq!(
        texts,
        vec![
            "+2 (page 0; items 2 of 6)",
            "+2 (page 1; items 4 of 6)",
            "+2 (page 2; items 6 of 6)",
            "+0 (page 3; items 6 of 6)",
        ]
    );
}

#[test]
fn generations_bump_once_per_landed_page() {
    let mut source = ScriptedSource::new();
    let mut pager = FeedPager::new();
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    let frame0 = list.render();
    assert_eq!(frame0.generation(), 0);

    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    let frame1 = list.render();
    assert_eq!(frame1.generation(), 1);
    assert_eq!(frame1.len(), 2);

    // No mutation between renders: identical frame back.
    let frame1_again = list.render();
    assert!(frame1.same(&frame1_again));

    // An exhausted skip is not a mutation.
    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    assert!(matches!(
        pager.load_next(&mut source, &mut list, &mut toasts, rekey),
        LoadOutcome::Exhausted
    ));
    let frame3 = list.render();
    assert_eq!(frame3.generation(), 2);
    assert_eq!(frame3.len(), 6);
    assert!(list.render().same(&frame3));
}

// ═══════════════════════════════════════════════════════════════════════
// Failure and guards
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn failed_page_recovers_on_retry() {
    let mut source = ScriptedSource::failing_on(1);
    let mut pager = FeedPager::new();
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    assert_eq!(list.len(), 2);
    list.render();

    // Page 1 fails: error toast, container untouched, cursor unmoved.
    let outcome = pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    assert!(matches!(outcome, LoadOutcome::Failed(_)));
    assert_eq!(list.len(), 2);
    assert!(!list.is_dirty());
    assert_eq!(pager.cursor().page, 1);
    assert!(pager.has_next());
    assert!(!pager.is_loading());

    let error_toast = toasts.iter().last().unwrap();
    assert_eq!(error_toast.text(), "request failed: upstream timed out");

    // The retry fetches the same page and lands it.
    let outcome = pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    assert!(matches!(outcome, LoadOutcome::Loaded { appended: 2 }));
    assert_eq!(list.len(), 4);
    // Keys keep counting; the failed fetch consumed none.
    assert_eq!(list.node_key(2), Some(&Key::Int(3)));
}

#[test]
fn in_flight_guard_skips_without_fetching() {
    let mut source = ScriptedSource::new();
    let mut pager = FeedPager::new();
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    pager.set_loading(true);
    assert!(matches!(
        pager.load_next(&mut source, &mut list, &mut toasts, rekey),
        LoadOutcome::AlreadyLoading
    ));
    assert_eq!(source.fetches, 0);
    assert!(toasts.is_idle());

    pager.set_loading(false);
    assert!(matches!(
        pager.load_next(&mut source, &mut list, &mut toasts, rekey),
        LoadOutcome::Loaded { .. }
    ));
}

#[test]
fn page_limit_wins_over_server_page_count() {
    let mut source = ScriptedSource::new();
    let mut pager = FeedPager::new().with_page_limit(1);
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    assert!(!pager.has_next());
    assert!(matches!(
        pager.load_next(&mut source, &mut list, &mut toasts, rekey),
        LoadOutcome::Exhausted
    ));
    // Server offered 3 pages; the cap stopped us at 2 fetches.
    assert_eq!(source.fetches, 2);
    assert_eq!(list.len(), 4);
}

// ═══════════════════════════════════════════════════════════════════════
// Toast lifecycle under the frame clock
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn load_toast_lives_and_dies_on_the_frame_clock() {
    let mut source = ScriptedSource::new();
    let mut pager = FeedPager::new();
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    assert_eq!(toasts.len(), 1);

    // Entry animation, then the 3s info dwell.
    toasts.advance(ms(100));
    assert_eq!(
        toasts.visible().next().unwrap().phase(),
        ToastPhase::Dwelling
    );
    toasts.advance(ms(3000));
    assert_eq!(toasts.visible().next().unwrap().phase(), ToastPhase::Exiting);

    // Exit, then the hidden linger, then gone.
    toasts.advance(ms(500));
    assert_eq!(toasts.visible().count(), 0);
    assert_eq!(toasts.len(), 1);
    toasts.advance(ms(500));
    assert!(toasts.is_idle());
}

#[test]
fn error_toast_dwells_longer_and_can_be_dismissed() {
    let mut source = ScriptedSource::failing_on(0);
    let mut pager = FeedPager::new();
    let mut list = review_list();
    let mut toasts = ToastQueue::new();

    pager.load_next(&mut source, &mut list, &mut toasts, rekey);
    let id = toasts.iter().next().unwrap().id();

    // Still dwelling where an info toast would already be exiting.
    toasts.advance(ms(100));
    toasts.advance(ms(5000));
    assert_eq!(
        toasts.visible().next().unwrap().phase(),
        ToastPhase::Dwelling
    );

    // Force-dismiss takes the short exit.
    toasts.dismiss(id);
    toasts.advance(ms(100));
    assert_eq!(toasts.visible().count(), 0);
    toasts.advance(ms(500));
    assert!(toasts.is_idle());
}

#[test]
fn dismissing_one_toast_leaves_the_rest_running() {
    let mut toasts = ToastQueue::new();
    let a = toasts.dispatch(ToastRequest::info("first", ms(3000)));
    let b = toasts.dispatch(ToastRequest::info("second", ms(3000)));

    toasts.advance(ms(100));
    toasts.dismiss(a);
    toasts.advance(ms(100));

    let visible: Vec<_> = toasts.visible().map(|t| t.id()).collect();
    assert_eq!(visible, vec![b]);
}
