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
//! Observation of changes made to an element tree.
//!
//! Changes are recorded as they happen and queued on every interested observer. Records are only
//! handed to the observers' callbacks by `deliver_mutation_records`, so that a burst of changes is
//! delivered as a single batch.
use super::*;
use std::cell::Cell;

thread_local! {
    static PENDING_OBSERVERS: RefCell<Vec<Weak<ObserverData>>> = RefCell::new(Vec::new());
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObserverOptions {
    /// Observe insertions and removals of children.
    pub child_list: bool,
    /// Observe changes of attribute values.
    pub attributes: bool,
    /// Extend the observation to all the descendants of the target.
    pub subtree: bool,
}

impl ObserverOptions {
    pub const STRUCTURE: Self = Self {
        child_list: true,
        attributes: false,
        subtree: true,
    };
}

#[derive(Clone, Debug)]
pub enum MutationKind {
    ChildList {
        added: Vec<Element>,
        removed: Vec<Element>,
    },
    Attributes {
        name: String,
    },
}

#[derive(Clone, Debug)]
pub struct MutationRecord {
    pub target: Element,
    pub kind: MutationKind,
}

type Callback = Box<dyn FnMut(&[MutationRecord])>;

struct ObserverData {
    callback: RefCell<Callback>,
    records: RefCell<Vec<MutationRecord>>,
    targets: RefCell<Vec<Weak<RefCell<ElementData>>>>,
    /// Set while the callback runs, so that a callback that triggers a new delivery is not
    /// re-entered.
    delivering: Cell<bool>,
}

pub(crate) struct Registration {
    observer: Weak<ObserverData>,
    options: ObserverOptions,
}

/// Observes changes made to elements.
///
/// The observation stops when the observer is disconnected or dropped.
pub struct MutationObserver {
    data: Rc<ObserverData>,
}

impl MutationObserver {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&[MutationRecord]) + 'static,
    {
        Self {
            data: Rc::new(ObserverData {
                callback: RefCell::new(Box::new(callback)),
                records: RefCell::new(Vec::new()),
                targets: RefCell::new(Vec::new()),
                delivering: Cell::new(false),
            }),
        }
    }

    /// Starts observing `target`. Observing an already observed target replaces its options.
    pub fn observe(&self, target: &Element, options: ObserverOptions) {
        let observer = Rc::downgrade(&self.data);
        {
            let mut data = target.0.borrow_mut();
            if let Some(registration) = data
                .registrations
                .iter_mut()
                .find(|r| r.observer.ptr_eq(&observer))
            {
                registration.options = options;
                return;
            }
            data.registrations.push(Registration { observer, options });
        }
        self.data.targets.borrow_mut().push(target.downgrade());
    }

    /// Stops the observation of all targets and discards the pending records.
    pub fn disconnect(&self) {
        let observer = Rc::downgrade(&self.data);
        for target in self.data.targets.borrow_mut().drain(..) {
            if let Some(target) = target.upgrade() {
                target
                    .borrow_mut()
                    .registrations
                    .retain(|r| !r.observer.ptr_eq(&observer));
            }
        }
        self.data.records.borrow_mut().clear();
    }

    /// Empties the record queue of the observer and returns what was in it.
    pub fn take_records(&self) -> Vec<MutationRecord> {
        std::mem::take(&mut *self.data.records.borrow_mut())
    }
}

impl Drop for MutationObserver {
    fn drop(&mut self) {
        self.disconnect()
    }
}

/// Hands the queued records to the callbacks of the observers, until no observer has pending
/// records.
///
/// Records queued by a callback are delivered in a following batch. Returns the number of
/// batches that were delivered.
pub fn deliver_mutation_records() -> usize {
    let mut nb_batch = 0;
    loop {
        let pending = PENDING_OBSERVERS.with(|p| std::mem::take(&mut *p.borrow_mut()));
        if pending.is_empty() {
            return nb_batch;
        }
        let mut delivered = false;
        let mut deferred = Vec::new();
        for observer in pending.iter().filter_map(Weak::upgrade) {
            if observer.delivering.get() {
                // called from this observer's callback, its records stay queued
                deferred.push(Rc::downgrade(&observer));
                continue;
            }
            let records = std::mem::take(&mut *observer.records.borrow_mut());
            if records.is_empty() {
                continue;
            }
            nb_batch += 1;
            delivered = true;
            log::trace!("delivering {} mutation records", records.len());
            observer.delivering.set(true);
            (&mut *observer.callback.borrow_mut())(&records);
            observer.delivering.set(false);
        }
        if !deferred.is_empty() {
            PENDING_OBSERVERS.with(|p| p.borrow_mut().extend(deferred));
        }
        if !delivered {
            return nb_batch;
        }
    }
}

pub(crate) fn queue_child_list_record(target: &Element, added: Vec<Element>, removed: Vec<Element>) {
    let kind = MutationKind::ChildList { added, removed };
    queue_record(target, kind, |options| options.child_list);
}

pub(crate) fn queue_attribute_record(target: &Element, name: &str) {
    let kind = MutationKind::Attributes {
        name: name.to_string(),
    };
    queue_record(target, kind, |options| options.attributes);
}

fn queue_record<F>(target: &Element, kind: MutationKind, interested: F)
where
    F: Fn(&ObserverOptions) -> bool,
{
    let mut observers: Vec<Rc<ObserverData>> = Vec::new();
    for (depth, element) in target.inclusive_ancestors().iter().enumerate() {
        let data = element.0.borrow();
        for registration in data.registrations.iter() {
            if depth > 0 && !registration.options.subtree {
                continue;
            }
            if !interested(&registration.options) {
                continue;
            }
            if let Some(observer) = registration.observer.upgrade() {
                if !observers.iter().any(|o| Rc::ptr_eq(o, &observer)) {
                    observers.push(observer);
                }
            }
        }
    }

    for observer in observers {
        let was_empty = {
            let mut records = observer.records.borrow_mut();
            let was_empty = records.is_empty();
            records.push(MutationRecord {
                target: target.clone(),
                kind: kind.clone(),
            });
            was_empty
        };
        if was_empty {
            PENDING_OBSERVERS.with(|p| p.borrow_mut().push(Rc::downgrade(&observer)));
        }
    }
}
