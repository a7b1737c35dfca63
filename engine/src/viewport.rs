//! The page viewport and its scroll event source.
//!
//! `Viewport` owns the vertical offset of the page body and notifies
//! listeners every time it changes. Listeners are passive: they observe the
//! new offset and cannot veto, delay or alter the scroll.
//!
//! Registration hands back a [`Subscription`] guard; dropping it unregisters
//! the listener. Everything here lives on the UI thread, so the registry is
//! `Rc<RefCell<_>>` rather than a lock.

use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};

use folio_types::ScrollOffset;

type Listener = Box<dyn FnMut(ScrollOffset)>;

struct Entry {
    id: u64,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
    /// Set while listeners run; removals are deferred until dispatch ends.
    dispatching: bool,
    removed: Vec<u64>,
}

impl Registry {
    fn remove(&mut self, id: u64) {
        if self.dispatching {
            self.removed.push(id);
        } else {
            self.entries.retain(|entry| entry.id != id);
        }
    }
}

/// Guard for a registered scroll listener. Unregisters on drop.
#[must_use = "dropping the subscription unregisters the listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The viewport may already be gone; then there is nothing to detach.
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

pub struct Viewport {
    offset: ScrollOffset,
    max: ScrollOffset,
    /// Visible body rows, used for page-wise scrolling.
    page_rows: u16,
    registry: Rc<RefCell<Registry>>,
}

impl Viewport {
    /// A viewport positioned at `offset`.
    ///
    /// Bounds are unknown until the first layout, so the offset is not
    /// clamped until [`Viewport::set_bounds`] is called.
    #[must_use]
    pub fn new(offset: ScrollOffset) -> Self {
        Self {
            offset,
            max: ScrollOffset::new(u16::MAX),
            page_rows: 1,
            registry: Rc::default(),
        }
    }

    #[must_use]
    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    #[must_use]
    pub fn max(&self) -> ScrollOffset {
        self.max
    }

    #[must_use]
    pub fn page_rows(&self) -> u16 {
        self.page_rows
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let registry = self.registry.borrow();
        registry
            .entries
            .len()
            .saturating_sub(registry.removed.len())
    }

    /// Register a passive scroll listener.
    pub fn subscribe(&self, listener: impl FnMut(ScrollOffset) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            listener: Box::new(listener),
        });
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Update the scrollable range after layout, clamping the offset into it.
    pub fn set_bounds(&mut self, max: ScrollOffset, page_rows: u16) {
        self.max = max;
        self.page_rows = page_rows.max(1);
        if self.offset > max {
            self.scroll_to(max);
        }
    }

    /// Move to `offset` (clamped). Listeners run only if the offset changed.
    pub fn scroll_to(&mut self, offset: ScrollOffset) {
        let offset = offset.min(self.max);
        if offset == self.offset {
            return;
        }
        self.offset = offset;
        self.dispatch(offset);
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_to(self.offset.offset_by(delta, self.max));
    }

    fn dispatch(&self, offset: ScrollOffset) {
        let mut running = {
            let mut registry = self.registry.borrow_mut();
            registry.dispatching = true;
            mem::take(&mut registry.entries)
        };

        for entry in &mut running {
            // A listener earlier in this pass may have dropped a later one.
            if self.registry.borrow().removed.contains(&entry.id) {
                continue;
            }
            (entry.listener)(offset);
        }

        let mut registry = self.registry.borrow_mut();
        registry.dispatching = false;
        // Listeners registered during the pass landed in the fresh vec.
        running.append(&mut registry.entries);
        let removed = mem::take(&mut registry.removed);
        running.retain(|entry| !removed.contains(&entry.id));
        registry.entries = running;
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("offset", &self.offset)
            .field("max", &self.max)
            .field("page_rows", &self.page_rows)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use folio_types::ScrollOffset;

    use super::{Subscription, Viewport};

    fn recorder(viewport: &Viewport) -> (Rc<RefCell<Vec<u16>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = viewport.subscribe(move |offset| sink.borrow_mut().push(offset.rows()));
        (seen, sub)
    }

    #[test]
    fn listeners_see_every_change_in_order() {
        let mut viewport = Viewport::new(ScrollOffset::TOP);
        let (seen, _sub) = recorder(&viewport);

        viewport.scroll_by(3);
        viewport.scroll_by(-1);
        viewport.scroll_to(ScrollOffset::new(40));

        assert_eq!(*seen.borrow(), [3, 2, 40]);
    }

    #[test]
    fn unchanged_offset_does_not_fire() {
        let mut viewport = Viewport::new(ScrollOffset::new(5));
        let (seen, _sub) = recorder(&viewport);

        viewport.scroll_to(ScrollOffset::new(5));
        viewport.scroll_by(0);

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn dropping_subscription_detaches_listener() {
        let mut viewport = Viewport::new(ScrollOffset::TOP);
        let (seen, sub) = recorder(&viewport);
        assert_eq!(viewport.listener_count(), 1);

        drop(sub);
        assert_eq!(viewport.listener_count(), 0);

        viewport.scroll_by(10);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn subscription_outliving_viewport_is_harmless() {
        let viewport = Viewport::new(ScrollOffset::TOP);
        let (_seen, sub) = recorder(&viewport);
        drop(viewport);
        drop(sub);
    }

    #[test]
    fn bounds_clamp_a_restored_offset_and_notify() {
        let mut viewport = Viewport::new(ScrollOffset::new(90));
        let (seen, _sub) = recorder(&viewport);

        viewport.set_bounds(ScrollOffset::new(30), 12);

        assert_eq!(viewport.offset(), ScrollOffset::new(30));
        assert_eq!(viewport.page_rows(), 12);
        assert_eq!(*seen.borrow(), [30]);

        viewport.scroll_by(5);
        assert_eq!(viewport.offset(), ScrollOffset::new(30));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn listener_may_drop_another_subscription_mid_dispatch() {
        let mut viewport = Viewport::new(ScrollOffset::TOP);
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&victim);
        let _killer = viewport.subscribe(move |_| {
            slot.borrow_mut().take();
        });
        let (seen, sub) = recorder(&viewport);
        *victim.borrow_mut() = Some(sub);

        viewport.scroll_by(1);
        viewport.scroll_by(1);

        assert!(seen.borrow().is_empty());
        assert_eq!(viewport.listener_count(), 1);
    }
}
