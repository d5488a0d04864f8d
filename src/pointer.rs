use std::cell::RefCell;
use std::rc::{Rc, Weak};

type ReleaseHandler = Box<dyn FnMut()>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, ReleaseHandler)>,
    dispatching: bool,
    dropped_while_dispatching: Vec<u64>,
}

impl HubInner {
    fn remove(&mut self, id: u64) {
        self.listeners.retain(|(listener, _)| *listener != id);
        if self.dispatching {
            self.dropped_while_dispatching.push(id);
        }
    }
}

/// Application-wide pointer-release listeners. The host feeds every release it sees
/// into [`PointerHub::dispatch_release`], wherever the pointer happens to be.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_release(&self, handler: impl FnMut() + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(handler)));
        log::debug!("release listener {id} registered");
        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Runs every registered handler and returns how many ran.
    pub fn dispatch_release(&self) -> usize {
        // Handlers run outside the borrow so they may subscribe or unsubscribe.
        let mut running = {
            let mut inner = self.inner.borrow_mut();
            inner.dispatching = true;
            std::mem::take(&mut inner.listeners)
        };
        for (_, handler) in running.iter_mut() {
            handler();
        }
        let count = running.len();

        let mut inner = self.inner.borrow_mut();
        let dropped = std::mem::take(&mut inner.dropped_while_dispatching);
        running.retain(|(id, _)| !dropped.contains(id));
        running.append(&mut inner.listeners);
        inner.listeners = running;
        inner.dispatching = false;
        count
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Keeps a release listener registered for as long as it is alive.
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner.borrow_mut().remove(self.id);
            log::debug!("release listener {} removed", self.id);
        }
    }
}
