//! Promotional carousel state machine.
//!
//! The carousel cycles through a fixed number of slides. Every change, whether
//! triggered by the auto-advance timer or by the customer, goes through a short
//! `Transitioning` phase that the view uses to fade content out and in:
//!
//! ```text
//!            trigger                  settle delay elapsed
//! Idle(i) ───────────▶ Transitioning(i → j) ───────────────▶ Idle(j)
//!                         │      ▲
//!                         └──────┘ trigger: re-target j, same settle
//! ```
//!
//! Only one settle is ever in flight. A trigger during a transition moves the
//! pending target but does not extend the fade window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use super::scheduler::{self, TaskHandle};
use crate::config::CarouselTiming;

/// Number of slides on the home page promo carousel.
pub const DEFAULT_SLIDE_COUNT: usize = 3;

/// Phase of the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CarouselPhase {
    /// Showing slide `index`.
    Idle { index: usize },
    /// Fading from slide `from` to slide `to`.
    Transitioning { from: usize, to: usize },
}

/// A requested slide change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
    To(usize),
}

/// Snapshot of the carousel published to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselState {
    #[serde(flatten)]
    phase: CarouselPhase,
    slide_count: usize,
}

impl CarouselState {
    /// Initial state: showing the first slide.
    ///
    /// A `slide_count` of zero is treated as one.
    #[must_use]
    pub const fn new(slide_count: usize) -> Self {
        Self {
            phase: CarouselPhase::Idle { index: 0 },
            slide_count: if slide_count == 0 { 1 } else { slide_count },
        }
    }

    #[must_use]
    pub const fn phase(&self) -> CarouselPhase {
        self.phase
    }

    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// The slide currently on screen.
    ///
    /// During a transition this is still the slide being faded out.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self.phase {
            CarouselPhase::Idle { index } => index,
            CarouselPhase::Transitioning { from, .. } => from,
        }
    }

    /// True only while a slide change is settling.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        matches!(self.phase, CarouselPhase::Transitioning { .. })
    }

    /// Slide that will be shown once the current transition settles.
    #[must_use]
    pub const fn pending_target(&self) -> Option<usize> {
        match self.phase {
            CarouselPhase::Idle { .. } => None,
            CarouselPhase::Transitioning { to, .. } => Some(to),
        }
    }

    /// Resolve a step to a slide index.
    ///
    /// Relative steps are taken from the slide on screen, which during a
    /// transition is still the one fading out.
    #[must_use]
    pub const fn resolve(&self, step: Step) -> usize {
        let n = self.slide_count;
        let anchor = self.index();
        match step {
            Step::Next => (anchor + 1) % n,
            Step::Previous => (anchor + n - 1) % n,
            Step::To(index) => index % n,
        }
    }

    /// Start (or re-target) a transition to `to`.
    ///
    /// Returns true when a new settle has to be scheduled, i.e. when the
    /// carousel was idle.
    pub const fn begin(&mut self, to: usize) -> bool {
        let to = to % self.slide_count;
        match self.phase {
            CarouselPhase::Idle { index } => {
                self.phase = CarouselPhase::Transitioning { from: index, to };
                true
            }
            CarouselPhase::Transitioning { from, .. } => {
                self.phase = CarouselPhase::Transitioning { from, to };
                false
            }
        }
    }

    /// Finish the pending transition. Returns false if there was none.
    pub const fn settle(&mut self) -> bool {
        match self.phase {
            CarouselPhase::Idle { .. } => false,
            CarouselPhase::Transitioning { to, .. } => {
                self.phase = CarouselPhase::Idle { index: to };
                true
            }
        }
    }
}

/// State shared with timer callbacks.
///
/// Callbacks only hold a `Weak` reference, so a dropped controller is never
/// touched by a late timer.
struct Shared {
    state: watch::Sender<CarouselState>,
    settle: Mutex<Option<TaskHandle>>,
    settle_delay: Duration,
    torn_down: AtomicBool,
}

impl Shared {
    fn trigger(self: &Arc<Self>, step: Step) -> CarouselState {
        if self.torn_down.load(Ordering::Acquire) {
            tracing::debug!(?step, "Carousel is torn down, ignoring trigger");
            return *self.state.borrow();
        }

        let mut needs_settle = false;
        self.state.send_if_modified(|state| {
            let before = *state;
            let to = state.resolve(step);
            needs_settle = state.begin(to);
            *state != before
        });

        let snapshot = *self.state.borrow();
        tracing::debug!(?step, phase = ?snapshot.phase(), "Carousel transition");

        if needs_settle {
            let weak: Weak<Self> = Arc::downgrade(self);
            let handle = scheduler::spawn_after(self.settle_delay, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.settle();
                }
            });
            *self.settle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        }

        snapshot
    }

    fn settle(&self) {
        if self.torn_down.load(Ordering::Acquire) {
            return;
        }
        self.state.send_if_modified(CarouselState::settle);
    }
}

/// Drives the promo carousel: auto-advance timer, manual navigation and the
/// transition flag.
///
/// All methods that change slides spawn the settle task and therefore must be
/// called from within a Tokio runtime.
pub struct CarouselController {
    shared: Arc<Shared>,
    timer: Mutex<Option<TaskHandle>>,
    interval: Duration,
}

impl CarouselController {
    /// Create a controller showing slide 0. The timer is not started.
    #[must_use]
    pub fn new(slide_count: usize, timing: CarouselTiming) -> Self {
        let (state, _) = watch::channel(CarouselState::new(slide_count));
        Self {
            shared: Arc::new(Shared {
                state,
                settle: Mutex::new(None),
                settle_delay: timing.settle_delay,
                torn_down: AtomicBool::new(false),
            }),
            timer: Mutex::new(None),
            interval: timing.interval,
        }
    }

    /// Register the auto-advance timer.
    ///
    /// The timer is registered at most once per controller; later calls and
    /// calls after [`shutdown`](Self::shutdown) return false.
    pub fn start(&self) -> bool {
        if self.shared.torn_down.load(Ordering::Acquire) {
            return false;
        }

        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.is_some() {
            tracing::warn!("Carousel timer already registered");
            return false;
        }

        let weak = Arc::downgrade(&self.shared);
        *timer = Some(scheduler::spawn_repeating(self.interval, move || {
            if let Some(shared) = weak.upgrade() {
                shared.trigger(Step::Next);
            }
        }));
        drop(timer);

        tracing::debug!(interval = ?self.interval, "Carousel timer started");
        true
    }

    /// Whether the auto-advance timer is registered, its task is still
    /// alive and the controller is not torn down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.shared.torn_down.load(Ordering::Acquire)
            && self
                .timer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .is_some_and(|timer| !timer.is_finished())
    }

    /// Move to the next slide, wrapping to the first.
    pub fn advance(&self) -> CarouselState {
        self.shared.trigger(Step::Next)
    }

    /// Move to the previous slide, wrapping to the last.
    pub fn retreat(&self) -> CarouselState {
        self.shared.trigger(Step::Previous)
    }

    /// Move to slide `index` (taken modulo the slide count).
    pub fn jump_to(&self, index: usize) -> CarouselState {
        self.shared.trigger(Step::To(index))
    }

    #[must_use]
    pub fn state(&self) -> CarouselState {
        *self.shared.state.borrow()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CarouselState> {
        self.shared.state.subscribe()
    }

    /// Tear the carousel down.
    ///
    /// Cancels the timer and any pending settle. A pending transition is
    /// completed first so the last published state is not left mid-fade.
    /// Every later trigger or callback is ignored. Idempotent.
    pub fn shutdown(&self) {
        if self.shared.torn_down.load(Ordering::Acquire) {
            return;
        }

        if let Some(timer) = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            timer.cancel();
        }
        if let Some(settle) = self
            .shared
            .settle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            settle.cancel();
        }

        self.shared.state.send_if_modified(CarouselState::settle);
        self.shared.torn_down.store(true, Ordering::Release);
        tracing::debug!("Carousel torn down");
    }
}

impl Drop for CarouselController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for CarouselController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselController")
            .field("state", &self.state())
            .field("interval", &self.interval)
            .field("settle_delay", &self.shared.settle_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> CarouselController {
        CarouselController::new(DEFAULT_SLIDE_COUNT, CarouselTiming::default())
    }

    // =========================================================================
    // Pure state machine
    // =========================================================================

    #[test]
    fn test_initial_state() {
        let state = CarouselState::new(3);
        assert_eq!(state.phase(), CarouselPhase::Idle { index: 0 });
        assert!(!state.is_transitioning());
        assert_eq!(state.pending_target(), None);
    }

    #[test]
    fn test_resolve_wraps() {
        let mut state = CarouselState::new(3);
        assert_eq!(state.resolve(Step::Next), 1);
        assert_eq!(state.resolve(Step::Previous), 2);
        assert_eq!(state.resolve(Step::To(5)), 2);
        assert_eq!(state.resolve(Step::To(5)), state.resolve(Step::To(2)));

        state.begin(2);
        state.settle();
        assert_eq!(state.resolve(Step::Next), 0);
    }

    #[test]
    fn test_begin_then_retarget_then_settle() {
        let mut state = CarouselState::new(3);
        assert!(state.begin(1));
        assert_eq!(state.index(), 0);
        assert_eq!(state.pending_target(), Some(1));

        assert!(!state.begin(2));
        assert_eq!(
            state.phase(),
            CarouselPhase::Transitioning { from: 0, to: 2 }
        );

        assert!(state.settle());
        assert_eq!(state.phase(), CarouselPhase::Idle { index: 2 });
        assert!(!state.settle());
    }

    #[test]
    fn test_single_slide_always_zero() {
        let mut state = CarouselState::new(0);
        assert_eq!(state.slide_count(), 1);
        assert_eq!(state.resolve(Step::Next), 0);
        assert_eq!(state.resolve(Step::Previous), 0);
        state.begin(7);
        assert_eq!(state.pending_target(), Some(0));
    }

    #[test]
    fn test_serialize_phase() {
        let json = serde_json::to_value(CarouselState::new(3)).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["index"], 0);
        assert_eq!(json["slide_count"], 3);
    }

    // =========================================================================
    // Controller
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_advance_settles_after_delay() {
        let carousel = controller();

        let state = carousel.advance();
        assert!(state.is_transitioning());
        assert_eq!(state.index(), 0);

        sleep(ms(149)).await;
        assert!(carousel.state().is_transitioning());

        sleep(ms(2)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_retreat_from_zero_wraps_to_last() {
        let carousel = controller();
        carousel.retreat();
        sleep(ms(200)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_out_of_range_is_modulo() {
        let carousel = controller();
        carousel.jump_to(5);
        sleep(ms(200)).await;
        assert_eq!(carousel.state().index(), 2);
    }

    #[test]
    fn test_resolve_during_transition_uses_shown_slide() {
        let mut state = CarouselState::new(3);
        state.begin(1);
        assert_eq!(state.index(), 0);
        assert_eq!(state.resolve(Step::Next), 1);
        assert_eq!(state.resolve(Step::Previous), 2);
        assert_eq!(state.resolve(Step::To(4)), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retarget_does_not_extend_window() {
        let carousel = controller();
        carousel.advance();

        sleep(ms(100)).await;
        let state = carousel.jump_to(2);
        assert_eq!(
            state.phase(),
            CarouselPhase::Transitioning { from: 0, to: 2 }
        );

        sleep(ms(51)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_during_transition_steps_from_shown_slide() {
        let carousel = controller();
        carousel.advance();
        let shown = carousel.state().index();

        sleep(ms(50)).await;
        let state = carousel.advance();
        assert_eq!(state.pending_target(), Some((shown + 1) % 3));

        sleep(ms(200)).await;
        assert_eq!(carousel.state().index(), (shown + 1) % 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_advances_on_cadence() {
        let carousel = controller();
        assert!(carousel.start());

        sleep(ms(4999)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 0 });

        sleep(ms(2)).await;
        assert_eq!(
            carousel.state().phase(),
            CarouselPhase::Transitioning { from: 0, to: 1 }
        );

        sleep(ms(150)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 1 });

        sleep(ms(5000)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 2 });

        sleep(ms(5000)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_registers_once() {
        let carousel = controller();
        assert!(carousel.start());
        assert!(!carousel.start());
        assert!(carousel.is_running());

        sleep(ms(5200)).await;
        assert_eq!(carousel.state().index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_advance_does_not_reset_timer() {
        let carousel = controller();
        carousel.start();

        sleep(ms(4900)).await;
        carousel.advance();

        // The tick at 5000 ms lands mid-fade and steps from the shown slide,
        // so slide 1 is not skipped.
        sleep(ms(120)).await;
        assert_eq!(
            carousel.state().phase(),
            CarouselPhase::Transitioning { from: 0, to: 1 }
        );

        sleep(ms(40)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 1 });

        // Next tick stays on the original 5 s grid.
        sleep(ms(4939)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 1 });
        sleep(ms(152)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_all_updates() {
        let carousel = controller();
        carousel.start();
        carousel.advance();
        carousel.shutdown();

        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 1 });
        assert!(!carousel.is_running());

        sleep(ms(20_000)).await;
        assert_eq!(carousel.state().phase(), CarouselPhase::Idle { index: 1 });

        let state = carousel.advance();
        assert!(!state.is_transitioning());
        assert!(!carousel.start());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let carousel = controller();
        carousel.start();
        let rx = carousel.subscribe();
        drop(carousel);

        sleep(ms(20_000)).await;
        assert_eq!(rx.borrow().phase(), CarouselPhase::Idle { index: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_both_edges() {
        let carousel = controller();
        let mut rx = carousel.subscribe();

        carousel.advance();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_transitioning());

        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().phase(),
            CarouselPhase::Idle { index: 1 }
        );
    }
}
