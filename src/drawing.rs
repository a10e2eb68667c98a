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
//! Drawings: the hosts of bases and bonds.
//!
//! `Drawing` is what the components of this crate need from a drawing. `SvgDrawing` is a drawing
//! of `BaseMarker`s connected by straight primary bonds, living in a rendered SVG document.
use super::events::Subscription;
use super::inverted_straight_bonds_hider::InvertedStraightBondsHider;
use super::nucleobase::{BaseMarker, Nucleobase};
use super::points::Point;
use super::saved::{DeserializationError, SerializationError};
use super::straight_bond::StraightBond;
use super::StraightBondDefaults;
use rnacanvas_svg::{
    deliver_mutation_records, Document, Element, HierarchyError, MutationObserver,
    MutationRecord, ObserverOptions, ParseError,
};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// A bond between two bases.
pub trait Bond {
    type Base: Nucleobase;
    fn base1(&self) -> &Rc<Self::Base>;
    fn base2(&self) -> &Rc<Self::Base>;
}

pub trait Drawing {
    type Base: Nucleobase;
    type PrimaryBond: Bond<Base = Self::Base>;

    /// The root element of the drawing.
    fn dom_node(&self) -> Element;

    /// The ordering of the bases is the ordering of the bases in the drawing.
    fn bases(&self) -> Vec<Rc<Self::Base>>;

    fn base_by_id(&self, id: &str) -> Option<Rc<Self::Base>> {
        self.bases().into_iter().find(|b| b.id() == id)
    }

    fn primary_bonds(&self) -> Vec<Self::PrimaryBond>;

    /// Adds a primary bond between the two bases.
    fn add_primary_bond(&self, base1: &Rc<Self::Base>, base2: &Rc<Self::Base>);

    /// Registers `on_change` to be called after elements are added to or removed from the
    /// drawing. Changes made in a row may be reported by a single call.
    fn observe_structure(&self, on_change: Box<dyn FnMut()>) -> Subscription;
}

/// A saved base: the id of its text element and the position of its center.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedBase {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDrawing {
    /// The markup of the drawing.
    pub svg: String,
    pub bases: Vec<SavedBase>,
    /// Saved straight bonds, in their current or in a legacy form.
    #[serde(default)]
    pub primary_bonds: Vec<Value>,
}

#[derive(Debug)]
pub enum DrawingLoadError {
    Markup(ParseError),
    BaseNotFound(String),
    PrimaryBond(DeserializationError),
}

impl std::fmt::Display for DrawingLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markup(e) => write!(f, "Could not read the drawing: {}", e),
            Self::BaseNotFound(id) => write!(f, "Unable to find the text element of base {}", id),
            Self::PrimaryBond(e) => write!(f, "Could not recreate a primary bond: {}", e),
        }
    }
}

impl std::error::Error for DrawingLoadError {}

impl From<ParseError> for DrawingLoadError {
    fn from(e: ParseError) -> Self {
        Self::Markup(e)
    }
}

impl From<DeserializationError> for DrawingLoadError {
    fn from(e: DeserializationError) -> Self {
        Self::PrimaryBond(e)
    }
}

pub struct SvgDrawing {
    document: Document,
    bases: RefCell<Vec<Rc<BaseMarker>>>,
    primary_bonds: RefCell<Vec<StraightBond<BaseMarker>>>,
    defaults: StraightBondDefaults,
    inverted_bonds_hider: InvertedStraightBondsHider<BaseMarker>,
}

impl SvgDrawing {
    pub fn new() -> Self {
        Self::with_defaults(StraightBondDefaults::default())
    }

    /// A drawing whose new primary bonds are given `defaults`.
    pub fn with_defaults(defaults: StraightBondDefaults) -> Self {
        Self::from_document(Document::new(), defaults)
    }

    fn from_document(document: Document, defaults: StraightBondDefaults) -> Self {
        Self {
            document,
            bases: RefCell::new(Vec::new()),
            primary_bonds: RefCell::new(Vec::new()),
            defaults,
            inverted_bonds_hider: InvertedStraightBondsHider::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn defaults(&self) -> &StraightBondDefaults {
        &self.defaults
    }

    pub fn nb_bases(&self) -> usize {
        self.bases.borrow().len()
    }

    pub fn append_base(&self, base: Rc<BaseMarker>) -> Result<(), HierarchyError> {
        let len = self.nb_bases();
        self.insert_base(len, base)
    }

    /// Inserts `base` at position `index` of the sequence of bases. Indices past the end of the
    /// sequence append the base.
    pub fn insert_base(&self, index: usize, base: Rc<BaseMarker>) -> Result<(), HierarchyError> {
        let index = index.min(self.nb_bases());
        let next = self.bases.borrow().get(index).map(|b| b.dom_node().clone());
        self.document
            .root()
            .insert_before(base.dom_node(), next.as_ref())?;
        log::debug!("inserted base {:?} at position {}", base.id(), index);
        self.bases.borrow_mut().insert(index, base);
        Ok(())
    }

    /// Removes `base` and the primary bonds attached to it. Returns false if `base` is not in
    /// the drawing.
    pub fn remove_base(&self, base: &Rc<BaseMarker>) -> bool {
        let position = self.bases.borrow().iter().position(|b| Rc::ptr_eq(b, base));
        let position = match position {
            Some(position) => position,
            None => return false,
        };
        self.bases.borrow_mut().remove(position);
        base.dom_node().remove();

        let attached: Vec<StraightBond<BaseMarker>> = self
            .primary_bonds
            .borrow()
            .iter()
            .filter(|b| Rc::ptr_eq(b.base1(), base) || Rc::ptr_eq(b.base2(), base))
            .cloned()
            .collect();
        for bond in attached.iter() {
            self.remove_primary_bond(bond);
        }
        log::debug!(
            "removed base {:?} and {} primary bond(s)",
            base.id(),
            attached.len()
        );
        true
    }

    /// Removes `bond` from the drawing. The bond stops following its bases.
    pub fn remove_primary_bond(&self, bond: &StraightBond<BaseMarker>) -> bool {
        let position = self
            .primary_bonds
            .borrow()
            .iter()
            .position(|b| b.ptr_eq(bond));
        match position {
            Some(position) => {
                self.primary_bonds.borrow_mut().remove(position);
                self.inverted_bonds_hider.untrack(bond);
                bond.remove();
                bond.dispose();
                true
            }
            None => false,
        }
    }

    pub fn inverted_bonds_hider(&self) -> &InvertedStraightBondsHider<BaseMarker> {
        &self.inverted_bonds_hider
    }

    fn push_primary_bond(&self, bond: StraightBond<BaseMarker>) {
        if !bond.is_in(self.document.root()) {
            if let Err(e) = bond.append_to(self.document.root()) {
                log::error!("Could not add primary bond {:?}: {}", bond.id(), e);
                return;
            }
        }
        self.inverted_bonds_hider.track(&bond);
        self.primary_bonds.borrow_mut().push(bond);
    }

    /// Delivers the pending notifications of changes made to the drawing, and of the changes
    /// made in reaction to them.
    pub fn settle(&self) -> usize {
        deliver_mutation_records()
    }

    /// The saved form of the drawing.
    pub fn serialized(&self) -> Result<SavedDrawing, SerializationError> {
        let primary_bonds = self
            .primary_bonds
            .borrow()
            .iter()
            .map(|b| b.serialized().map(|s| s.to_value()))
            .collect::<Result<Vec<_>, _>>()?;
        let bases = self
            .bases
            .borrow()
            .iter()
            .map(|b| {
                let center = b.center_point().get();
                SavedBase {
                    id: b.id(),
                    x: center.x,
                    y: center.y,
                }
            })
            .collect();
        Ok(SavedDrawing {
            svg: self.document.root().to_markup(),
            bases,
            primary_bonds,
        })
    }

    /// Recreates a saved drawing. The new primary bonds of the drawing are given `defaults`.
    pub fn deserialized(
        saved: &SavedDrawing,
        defaults: StraightBondDefaults,
    ) -> Result<Self, DrawingLoadError> {
        let document = Document::parse(&saved.svg)?;
        let ret = Self::from_document(document, defaults);
        for saved_base in saved.bases.iter() {
            let text = ret
                .document
                .root()
                .get_element_by_id(&saved_base.id)
                .ok_or_else(|| DrawingLoadError::BaseNotFound(saved_base.id.clone()))?;
            let base = BaseMarker::from_text(text, Point::new(saved_base.x, saved_base.y));
            ret.bases.borrow_mut().push(base);
        }
        for saved_bond in saved.primary_bonds.iter() {
            let bond = StraightBond::deserialized(saved_bond, &ret)?;
            ret.push_primary_bond(bond);
        }
        Ok(ret)
    }
}

impl Default for SvgDrawing {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawing for SvgDrawing {
    type Base = BaseMarker;
    type PrimaryBond = StraightBond<BaseMarker>;

    fn dom_node(&self) -> Element {
        self.document.root().clone()
    }

    fn bases(&self) -> Vec<Rc<BaseMarker>> {
        self.bases.borrow().clone()
    }

    fn primary_bonds(&self) -> Vec<StraightBond<BaseMarker>> {
        self.primary_bonds.borrow().clone()
    }

    fn add_primary_bond(&self, base1: &Rc<BaseMarker>, base2: &Rc<BaseMarker>) {
        let bond = StraightBond::between_with_defaults(base1.clone(), base2.clone(), &self.defaults);
        log::debug!(
            "adding primary bond {:?} between {:?} and {:?}",
            bond.id(),
            base1.id(),
            base2.id()
        );
        self.push_primary_bond(bond);
    }

    fn observe_structure(&self, mut on_change: Box<dyn FnMut()>) -> Subscription {
        let observer = MutationObserver::new(move |_: &[MutationRecord]| on_change());
        observer.observe(self.document.root(), ObserverOptions::STRUCTURE);
        Subscription::new(move || observer.disconnect())
    }
}
