#![forbid(unsafe_code)]

//! Demo: an infinite review feed driven end to end through Lockstep.
//!
//! An in-memory paginated backend (with one page scripted to fail on its
//! first fetch) is pumped by a [`FeedPager`] into a
//! `RenderList<Review, ReviewCard>`. A [`ContextCell`] hands an
//! `update_review` callback to the "render path", which uses it mid-run to
//! edit a review in place. A simulated 16 ms frame clock steps the toast
//! queue, and a frame is printed only when the container's generation
//! actually changes.

use std::cell::RefCell;
use std::rc::Rc;

use lockstep::prelude::*;
use web_time::Duration;

// ─── Domain ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Review {
    id: i64,
    author: String,
    rating: u8,
    body: String,
}

/// The opaque render artifact: what the item looked like when its node was
/// built. Frozen until the item is rewritten through the container.
#[derive(Debug)]
struct ReviewCard {
    line: String,
}

fn review_binding() -> Binding<Review, ReviewCard> {
    Binding::new(
        |r: &Review| ReviewCard {
            line: format!("{:<10} {} {}", r.author, "★".repeat(r.rating as usize), r.body),
        },
        |r: &Review| Key::Int(r.id),
    )
}

// ─── Scripted backend ────────────────────────────────────────────────────────

const AUTHORS: [&str; 6] = ["alyona", "marat", "sveta", "dmitry", "olga", "pavel"];

/// Three pages of three reviews; page 1 fails on its first fetch.
struct ReviewSource {
    failed_once: bool,
}

impl PageSource<Review> for ReviewSource {
    fn fetch_page(&mut self, request: &PageRequest) -> Result<Page<Review>, FetchError> {
        if request.page == 1 && !self.failed_once {
            self.failed_once = true;
            return Err(FetchError::request("backend hiccup on page 1"));
        }
        let base = (request.page * request.page_size) as usize;
        let count = if request.page < 3 {
            request.page_size as usize
        } else {
            0
        };
        let items = (0..count)
            .map(|i| Review {
                id: 0, // pager assigns the real key
                author: AUTHORS[(base + i) % AUTHORS.len()].to_string(),
                rating: 1 + ((base + i) % 5) as u8,
                body: format!("review text {}", base + i),
            })
            .collect();
        Ok(Page {
            items,
            info: PageInfo {
                page: request.page,
                page_size: request.page_size,
                pages_count: 3,
                total_count: 9,
            },
        })
    }
}

// ─── Context hooks ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ReviewPatch {
    key: Key,
    rating: Option<u8>,
    body: Option<String>,
}

/// What the provider exposes to deeply nested consumers. The callback slot
/// is re-provided every cycle; the cell's identity never moves.
#[derive(Default)]
struct ReviewHooks {
    update_review: Option<Rc<dyn Fn(ReviewPatch)>>,
}

impl Merge for ReviewHooks {
    fn merge_from(&mut self, newer: Self) {
        self.update_review.merge_from(newer.update_review);
    }
}

// ─── Frame output ────────────────────────────────────────────────────────────

fn print_frame(frame: &ViewFrame<ReviewCard>, toasts: &ToastQueue) {
    println!("── frame (generation {}) ──", frame.generation());
    for node in frame.iter() {
        println!("  [{}] {}", node.key(), node.view().line);
    }
    for toast in toasts.visible() {
        println!("  toast: {}", toast.text());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let list = Rc::new(RefCell::new(RenderList::new(review_binding())));
    let mut pager = FeedPager::new();
    let mut toasts = ToastQueue::new();
    let mut source = ReviewSource { failed_once: false };

    // The provider scope: one cell, created once. Consumers hold readers.
    let hooks = ContextCell::new(ReviewHooks::default());
    let hooks_reader = hooks.reader();

    // Re-provide the callback each cycle, as a re-rendering provider would.
    // Identity stays put, so holding a reader never goes stale.
    let cell_id = hooks.id();
    let provide_hooks = |hooks: &ContextCell<ReviewHooks>| {
        let list = Rc::clone(&list);
        hooks.provide(ReviewHooks {
            update_review: Some(Rc::new(move |patch: ReviewPatch| {
                let mut list = list.borrow_mut();
                let Some(index) = list.position_by_key(&patch.key) else {
                    tracing::warn!(key = %patch.key, "update for unknown review");
                    return;
                };
                let Some(mut review) = list.get(index).cloned() else {
                    return;
                };
                if let Some(rating) = patch.rating {
                    review.rating = rating;
                }
                if let Some(body) = patch.body {
                    review.body = body;
                }
                if let Err(err) = list.set(index, review) {
                    tracing::warn!(error = %err, "review update rejected");
                }
            })),
        });
    };

    let frame_delta = Duration::from_millis(16);
    let mut last_generation = u64::MAX;

    // The cooperative update loop: load, provide, materialize, tick.
    for cycle in 0u32.. {
        if pager.has_next() {
            match pager.load_next(&mut source, &mut list.borrow_mut(), &mut toasts, |r, key| {
                r.id = key.as_int().unwrap_or_default();
            }) {
                LoadOutcome::Failed(err) => tracing::warn!(error = %err, "load failed, will retry"),
                LoadOutcome::Loaded { appended } => tracing::info!(appended, "page landed"),
                _ => {}
            }
        } else if toasts.is_idle() {
            break;
        }

        provide_hooks(&hooks);
        assert_eq!(hooks.id(), cell_id); // identity survives every provide

        // A nested consumer edits a review through the cell, not through
        // any direct reference to the container.
        if cycle == 3 {
            let update = hooks_reader.with(|h| h.update_review.clone());
            if let Some(update) = update {
                update(ReviewPatch {
                    key: Key::Int(2),
                    rating: Some(5),
                    body: Some("edited after the fact".to_string()),
                });
            }
        }

        let frame = list.borrow_mut().render();
        if frame.generation() != last_generation {
            last_generation = frame.generation();
            print_frame(&frame, &toasts);
        }

        toasts.advance(frame_delta);
    }

    println!(
        "done: {} reviews, cell provided {} times",
        list.borrow().len(),
        hooks.provides()
    );
}
