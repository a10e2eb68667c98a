/*
rnacanvas bonds, straight bonds between the bases of nucleic acid structure drawings.
    Copyright (C) 2026  The rnacanvas bonds developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Listener registries and the handles that unregister listeners.
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub type Listener = Rc<dyn Fn()>;

/// An ordered collection of listeners that are all called on `notify`.
#[derive(Default)]
pub struct Listeners {
    next_key: Cell<usize>,
    listeners: RefCell<Vec<(usize, Listener)>>,
}

impl Listeners {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Registers `listener`. The listener stays registered as long as the returned subscription
    /// is alive.
    pub fn add(self: &Rc<Self>, listener: Listener) -> Subscription {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.listeners.borrow_mut().push((key, listener));

        let registry: Weak<Self> = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.listeners.borrow_mut().retain(|(k, _)| *k != key);
            }
        })
    }

    /// Calls all the listeners, in registration order.
    ///
    /// Listeners may register or unregister listeners; the listeners called are the ones that
    /// were registered when `notify` was called.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener()
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle on a registration. Dropping it cancels the registration.
#[must_use = "dropping a subscription cancels it"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new<F: FnOnce() + 'static>(dispose: F) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    pub fn dispose(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose()
        }
    }

    /// Keeps the registration alive for the whole lifetime of its source.
    pub fn forget(mut self) {
        self.dispose = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose()
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}
