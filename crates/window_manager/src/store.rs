//! Observable in-memory state container for one desktop session.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    convert::Infallible,
    rc::Rc,
};

use crate::model::WindowManagerState;

/// Store listener invoked with the new snapshot after every mutation.
pub type StoreListener = Rc<dyn Fn(&WindowManagerState)>;

#[derive(Default)]
struct ListenerRegistry {
    next_token: u64,
    by_token: BTreeMap<u64, StoreListener>,
}

/// Shared handle to the window manager snapshot.
///
/// Clones share the same state and listeners. Mutations replace the snapshot and then notify
/// listeners synchronously; listeners may read or mutate the store again.
#[derive(Clone, Default)]
pub struct WindowStore {
    state: Rc<RefCell<WindowManagerState>>,
    listeners: Rc<RefCell<ListenerRegistry>>,
}

impl WindowStore {
    pub fn new(initial: WindowManagerState) -> Self {
        Self {
            state: Rc::new(RefCell::new(initial)),
            listeners: Rc::default(),
        }
    }

    /// Returns a clone of the current snapshot.
    pub fn get(&self) -> WindowManagerState {
        self.state.borrow().clone()
    }

    /// Reads the current snapshot without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&WindowManagerState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Replaces the snapshot with `updater(current)` and notifies listeners.
    pub fn set(&self, updater: impl FnOnce(&WindowManagerState) -> WindowManagerState) {
        let _ = self.update(|state| Ok::<_, Infallible>(Some(updater(state))));
    }

    /// Conditionally replaces the snapshot.
    ///
    /// `Ok(Some(next))` commits and notifies, `Ok(None)` leaves the store untouched and `Err` is
    /// returned to the caller. Returns whether a new snapshot was committed.
    pub fn update<E>(
        &self,
        updater: impl FnOnce(&WindowManagerState) -> Result<Option<WindowManagerState>, E>,
    ) -> Result<bool, E> {
        let next = {
            let current = self.state.borrow();
            updater(&current)?
        };
        let Some(next) = next else {
            return Ok(false);
        };
        *self.state.borrow_mut() = next;
        self.notify();
        Ok(true)
    }

    /// Registers `listener`; it stays registered until the returned handle is unsubscribed or
    /// dropped.
    pub fn subscribe(&self, listener: impl Fn(&WindowManagerState) + 'static) -> Subscription {
        let mut registry = self.listeners.borrow_mut();
        registry.next_token = registry.next_token.saturating_add(1);
        let token = registry.next_token;
        registry.by_token.insert(token, Rc::new(listener));
        Subscription {
            listeners: Rc::clone(&self.listeners),
            token,
            active: Cell::new(true),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().by_token.len()
    }

    fn notify(&self) {
        let listeners = self
            .listeners
            .borrow()
            .by_token
            .values()
            .cloned()
            .collect::<Vec<_>>();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.get();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

/// Drop-based listener registration handle.
pub struct Subscription {
    listeners: Rc<RefCell<ListenerRegistry>>,
    token: u64,
    active: Cell<bool>,
}

impl Subscription {
    /// Removes the listener if it is still registered.
    pub fn unsubscribe(&self) {
        if self.active.replace(false) {
            self.listeners.borrow_mut().by_token.remove(&self.token);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
