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
//! Hides the straight bonds whose base paddings can no longer be honored.
use super::events::Subscription;
use super::nucleobase::Nucleobase;
use super::straight_bond::{StraightBond, WeakStraightBond};
use ahash::RandomState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const VISIBILITY: &str = "visibility";
const HIDDEN: &str = "hidden";

struct Tracked<B: Nucleobase + 'static> {
    bond: WeakStraightBond<B>,
    _repositions: Subscription,
}

/// Hides inverted straight bonds and shows them again once they are no longer inverted.
///
/// Tracked bonds are re-evaluated after each of their repositions, i.e. after each move of one of
/// their bases and after each change of their base paddings.
pub struct InvertedStraightBondsHider<B: Nucleobase + 'static> {
    tracked: RefCell<HashMap<usize, Tracked<B>, RandomState>>,
}

impl<B: Nucleobase + 'static> Default for InvertedStraightBondsHider<B> {
    fn default() -> Self {
        Self {
            tracked: RefCell::new(HashMap::default()),
        }
    }
}

impl<B: Nucleobase + 'static> InvertedStraightBondsHider<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `bond`. Has no effect if the bond is already tracked.
    pub fn track(&self, bond: &StraightBond<B>) {
        if self.is_tracking(bond) {
            return;
        }
        self.forget_dropped_bonds();
        update_visibility(bond);

        let weak = bond.downgrade();
        let repositions = bond.on_reposition(Rc::new(move || {
            if let Some(bond) = weak.upgrade() {
                update_visibility(&bond)
            }
        }));
        self.tracked.borrow_mut().insert(
            bond.key(),
            Tracked {
                bond: bond.downgrade(),
                _repositions: repositions,
            },
        );
    }

    /// Stops tracking `bond` and shows it.
    pub fn untrack(&self, bond: &StraightBond<B>) {
        let removed = self.tracked.borrow_mut().remove(&bond.key());
        if removed.is_some() {
            bond.dom_node().remove_attribute(VISIBILITY);
        }
    }

    pub fn is_tracking(&self, bond: &StraightBond<B>) -> bool {
        self.tracked
            .borrow()
            .get(&bond.key())
            .and_then(|t| t.bond.upgrade())
            .map(|b| b.ptr_eq(bond))
            .unwrap_or(false)
    }

    /// The number of tracked bonds that are still alive.
    pub fn len(&self) -> usize {
        self.tracked
            .borrow()
            .values()
            .filter(|t| t.bond.upgrade().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes the entries of the bonds that were dropped while tracked.
    fn forget_dropped_bonds(&self) {
        self.tracked
            .borrow_mut()
            .retain(|_, t| t.bond.upgrade().is_some());
    }

    /// The number of entries, including those of dropped bonds that have not been forgotten yet.
    #[cfg(test)]
    pub(crate) fn nb_entries(&self) -> usize {
        self.tracked.borrow().len()
    }
}

fn update_visibility<B: Nucleobase + 'static>(bond: &StraightBond<B>) {
    let hidden = bond.get_attribute(VISIBILITY).as_deref() == Some(HIDDEN);
    if bond.is_inverted() && !hidden {
        log::debug!("hiding inverted straight bond {:?}", bond.id());
        // "visibility" is a valid attribute name
        let _ = bond.set_attribute(VISIBILITY, HIDDEN);
    } else if !bond.is_inverted() && hidden {
        bond.dom_node().remove_attribute(VISIBILITY);
    }
}
