//! Scroll observer: viewport offset -> header phase signal.
//!
//! Activation evaluates the current offset synchronously, so a view that
//! opens mid-page (restored session) renders the scrolled header on its very
//! first frame. After that every scroll event recomputes the phase from the
//! new offset alone.
//!
//! The observer holds the only writer of the phase signal, inside its
//! listener. Dropping the observer drops the [`Subscription`], which detaches
//! the listener and closes the signal. This holds on every exit path,
//! including early returns and unwinding.

use tokio::sync::watch;
use tracing::debug;

use folio_types::{ScrollOffset, ScrollPhase};

use crate::viewport::{Subscription, Viewport};

#[derive(Debug)]
pub struct ScrollObserver {
    phase: watch::Receiver<ScrollPhase>,
    _subscription: Subscription,
}

impl ScrollObserver {
    /// Attach to `viewport` and derive the initial phase from its offset.
    #[must_use]
    pub fn activate(viewport: &Viewport) -> Self {
        let initial = ScrollPhase::from_offset(viewport.offset());
        let (tx, rx) = watch::channel(initial);
        debug!(
            offset = viewport.offset().rows(),
            phase = initial.as_str(),
            "Scroll observer activated"
        );

        let subscription = viewport.subscribe(move |offset: ScrollOffset| {
            let next = ScrollPhase::from_offset(offset);
            tx.send_if_modified(|current| {
                if *current == next {
                    return false;
                }
                debug!(
                    offset = offset.rows(),
                    from = current.as_str(),
                    to = next.as_str(),
                    "Scroll phase changed"
                );
                *current = next;
                true
            });
        });

        Self {
            phase: rx,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        *self.phase.borrow()
    }

    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.phase().is_scrolled()
    }

    /// A reader handle on the phase signal. Readers only ever see the most
    /// recent value.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ScrollPhase> {
        self.phase.clone()
    }
}

#[cfg(test)]
mod tests {
    use folio_types::{ScrollOffset, ScrollPhase};

    use super::ScrollObserver;
    use crate::viewport::Viewport;

    #[test]
    fn activation_reads_the_current_offset() {
        let at_top = Viewport::new(ScrollOffset::new(20));
        assert_eq!(
            ScrollObserver::activate(&at_top).phase(),
            ScrollPhase::AtTop
        );

        let restored = Viewport::new(ScrollOffset::new(21));
        assert_eq!(
            ScrollObserver::activate(&restored).phase(),
            ScrollPhase::Scrolled
        );
    }

    #[test]
    fn follows_offsets_without_hysteresis() {
        let mut viewport = Viewport::new(ScrollOffset::TOP);
        let observer = ScrollObserver::activate(&viewport);

        let mut phases = Vec::new();
        for rows in [0, 10, 25, 15, 5] {
            viewport.scroll_to(ScrollOffset::new(rows));
            phases.push(observer.phase());
        }

        assert_eq!(
            phases,
            [
                ScrollPhase::AtTop,
                ScrollPhase::AtTop,
                ScrollPhase::Scrolled,
                ScrollPhase::AtTop,
                ScrollPhase::AtTop,
            ]
        );
    }

    #[test]
    fn readers_are_notified_only_on_transitions() {
        let mut viewport = Viewport::new(ScrollOffset::TOP);
        let observer = ScrollObserver::activate(&viewport);
        let mut reader = observer.watch();

        viewport.scroll_to(ScrollOffset::new(10));
        assert!(!reader.has_changed().expect("sender alive"));

        viewport.scroll_to(ScrollOffset::new(30));
        assert!(reader.has_changed().expect("sender alive"));
        assert_eq!(*reader.borrow_and_update(), ScrollPhase::Scrolled);

        viewport.scroll_to(ScrollOffset::new(40));
        assert!(!reader.has_changed().expect("sender alive"));
    }

    #[test]
    fn deactivation_detaches_and_freezes_the_signal() {
        let mut viewport = Viewport::new(ScrollOffset::TOP);
        let observer = ScrollObserver::activate(&viewport);
        let reader = observer.watch();
        assert_eq!(viewport.listener_count(), 1);

        drop(observer);
        assert_eq!(viewport.listener_count(), 0);

        viewport.scroll_to(ScrollOffset::new(100));
        assert_eq!(*reader.borrow(), ScrollPhase::AtTop);
        assert!(reader.has_changed().is_err(), "writer is gone");
    }

    #[test]
    fn deactivation_on_unwind_still_detaches() {
        let viewport = Viewport::new(ScrollOffset::TOP);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _observer = ScrollObserver::activate(&viewport);
            panic!("view torn down mid-frame");
        }));
        assert!(result.is_err());
        assert_eq!(viewport.listener_count(), 0);
    }
}
