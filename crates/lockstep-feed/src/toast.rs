#![forbid(unsafe_code)]

//! Tick-driven toast lifecycle.
//!
//! Each dispatched toast walks a fixed timeline: `Entering` (slide-in) →
//! `Dwelling` (the request's dwell) → `Exiting` (slide-out) → `Lingering`
//! (hidden, DOM-equivalent still mounted) → removed. A force-dismiss jumps
//! straight to a shortened exit and then the normal tail.
//!
//! There are no timers and no threads: the host render loop calls
//! [`ToastQueue::advance`] with its frame delta and the queue steps every
//! toast, carrying leftover time across phase boundaries so a large delta
//! cannot stall a toast mid-phase.

use web_time::Duration;

/// Slide-in time before a toast counts as fully shown.
const ENTRY: Duration = Duration::from_millis(100);
/// Slide-out time for a toast that dwelled to completion.
const EXIT: Duration = Duration::from_millis(500);
/// Slide-out time for a force-dismissed toast.
const DISMISS_EXIT: Duration = Duration::from_millis(100);
/// Hidden-but-mounted tail before removal.
const LINGER: Duration = Duration::from_millis(500);

/// Visual category of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// What a collaborator dispatches: kind, text, and how long to dwell once
/// fully shown.
#[derive(Debug, Clone)]
pub struct ToastRequest {
    pub kind: ToastKind,
    pub text: String,
    pub dwell: Duration,
}

impl ToastRequest {
    #[must_use]
    pub fn info(text: impl Into<String>, dwell: Duration) -> Self {
        Self {
            kind: ToastKind::Info,
            text: text.into(),
            dwell,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>, dwell: Duration) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
            dwell,
        }
    }
}

/// Handle for one dispatched toast. Monotonic per queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

/// Where a toast is on its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Sliding in.
    Entering,
    /// Fully visible, dwell timer running.
    Dwelling,
    /// Sliding out.
    Exiting,
    /// Hidden but not yet removed.
    Lingering,
}

impl ToastPhase {
    /// Whether a toast in this phase occupies screen space.
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, ToastPhase::Lingering)
    }
}

/// One live toast.
#[derive(Debug, Clone)]
pub struct Toast {
    id: ToastId,
    kind: ToastKind,
    text: String,
    dwell: Duration,
    phase: ToastPhase,
    /// Time left in the current phase.
    remaining: Duration,
}

impl Toast {
    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn phase(&self) -> ToastPhase {
        self.phase
    }

    /// Step this toast by `delta`. Returns `false` once the toast is done
    /// and should be removed. Leftover time past a phase boundary carries
    /// into the next phase.
    fn step(&mut self, mut delta: Duration) -> bool {
        loop {
            if delta < self.remaining {
                self.remaining -= delta;
                return true;
            }
            delta -= self.remaining;
            match self.phase {
                ToastPhase::Entering => {
                    self.phase = ToastPhase::Dwelling;
                    self.remaining = self.dwell;
                }
                ToastPhase::Dwelling => {
                    self.phase = ToastPhase::Exiting;
                    self.remaining = EXIT;
                }
                ToastPhase::Exiting => {
                    self.phase = ToastPhase::Lingering;
                    self.remaining = LINGER;
                }
                ToastPhase::Lingering => return false,
            }
            // A zero-length phase (dwell == 0) falls straight through on
            // the next pass.
        }
    }
}

/// The staged toast queue. Dispatch, step, read off what is visible.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a toast at the start of its timeline.
    pub fn dispatch(&mut self, request: ToastRequest) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        tracing::debug!(id = self.next_id, kind = ?request.kind, text = %request.text, "toast dispatched");
        self.toasts.push(Toast {
            id,
            kind: request.kind,
            text: request.text,
            dwell: request.dwell,
            phase: ToastPhase::Entering,
            remaining: ENTRY,
        });
        id
    }

    /// Force-hide a toast: jump to a shortened exit, then the normal
    /// lingering tail. No effect on toasts already exiting or lingering,
    /// or on unknown ids.
    pub fn dismiss(&mut self, id: ToastId) {
        if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id)
            && matches!(toast.phase, ToastPhase::Entering | ToastPhase::Dwelling)
        {
            toast.phase = ToastPhase::Exiting;
            toast.remaining = DISMISS_EXIT;
        }
    }

    /// Step every toast by `delta` and drop the finished ones.
    pub fn advance(&mut self, delta: Duration) {
        self.toasts.retain_mut(|toast| toast.step(delta));
    }

    /// Toasts currently occupying screen space, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(|t| t.phase.is_visible())
    }

    /// All live toasts, lingering ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// True when nothing remains on any timeline.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.toasts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
