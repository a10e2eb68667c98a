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
//! Adds the primary bonds that are missing between consecutive bases.
use super::drawing::{Bond, Drawing};
use super::events::Subscription;
use ahash::RandomState;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Watches the structure of a drawing and makes sure that every two consecutive bases of the
/// drawing are connected by a primary bond.
///
/// Primary bonds are never removed. The drawing is watched as long as the adder is alive.
pub struct MissingPrimaryBondsAdder {
    _drawing_observation: Subscription,
}

impl MissingPrimaryBondsAdder {
    pub fn new<D: Drawing + 'static>(target_drawing: &Rc<D>) -> Self {
        let drawing = Rc::downgrade(target_drawing);
        let observation = target_drawing.observe_structure(Box::new(move || {
            if let Some(drawing) = drawing.upgrade() {
                add_missing_primary_bonds(drawing.as_ref());
            }
        }));
        Self {
            _drawing_observation: observation,
        }
    }
}

fn key<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as usize
}

/// Asks `drawing` to add a primary bond between each pair of consecutive bases that are not
/// already bonded. Returns the number of bonds that were requested.
///
/// Bases are consecutive when one immediately follows the other in `drawing.bases()`.
pub fn add_missing_primary_bonds<D: Drawing>(drawing: &D) -> usize {
    let bases = drawing.bases();

    // primary bond partners of all the bases
    let mut partners: HashMap<usize, HashSet<usize, RandomState>, RandomState> =
        HashMap::with_capacity_and_hasher(bases.len(), Default::default());
    for base in bases.iter() {
        partners.insert(key(base), HashSet::default());
    }
    for bond in drawing.primary_bonds() {
        let (k1, k2) = (key(bond.base1()), key(bond.base2()));
        if let Some(p) = partners.get_mut(&k1) {
            p.insert(k2);
        }
        if let Some(p) = partners.get_mut(&k2) {
            p.insert(k1);
        }
    }

    let mut nb_added = 0;
    for pair in bases.windows(2) {
        let bonded = partners
            .get(&key(&pair[0]))
            .map(|p| p.contains(&key(&pair[1])))
            .unwrap_or(false);
        if !bonded {
            drawing.add_primary_bond(&pair[0], &pair[1]);
            nb_added += 1;
        }
    }
    if nb_added > 0 {
        log::debug!("added {} missing primary bond(s)", nb_added);
    }
    nb_added
}
