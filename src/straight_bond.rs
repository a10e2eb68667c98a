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
//! Bonds that are straight lines between two bases.
use super::drawing::{Bond, Drawing};
use super::events::{Listener, Listeners, Subscription};
use super::nucleobase::Nucleobase;
use super::points::{direction, distance, Point};
use super::saved::{DeserializationError, SavedStraightBond, SerializationError};
use super::StraightBondDefaults;
use rnacanvas_svg::line::{self, RenderError};
use rnacanvas_svg::{assign_uuid, AttributeError, Element, HierarchyError};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct BondData<B: Nucleobase> {
    line: Element,
    base1: Rc<B>,
    base2: Rc<B>,
    /// The distance that point 1 is meant to be from the center of base 1. This is not the
    /// current distance, which is only restored on the next reposition.
    base_padding1: Cell<f64>,
    base_padding2: Cell<f64>,
    repositioned: Rc<Listeners>,
    base_subscriptions: RefCell<Vec<Subscription>>,
}

impl<B: Nucleobase> BondData<B> {
    fn reposition(&self) {
        let center1 = self.base1.center_point();
        let center2 = self.base2.center_point();
        let a = direction(center1, center2);
        let unit = Point::new(a.cos(), a.sin());

        let point1 = center1 + unit * self.base_padding1.get();
        let point2 = center2 - unit * self.base_padding2.get();
        for (name, value) in [
            ("x1", point1.x),
            ("y1", point1.y),
            ("x2", point2.x),
            ("y2", point2.y),
        ] {
            if let Err(e) = self.line.set_attribute(name, value.to_string()) {
                log::error!("Could not reposition straight bond: {}", e);
            }
        }
        log::trace!(
            "repositioned straight bond {:?}: ({}, {}) -> ({}, {})",
            self.line.id(),
            point1.x,
            point1.y,
            point2.x,
            point2.y
        );
        self.repositioned.notify();
    }
}

/// A bond that is a straight line between two bases.
///
/// A `StraightBond` is a handle: clones refer to the same bond. The bond follows the moves of its
/// bases until it is disposed of or until its last handle is dropped.
pub struct StraightBond<B: Nucleobase + 'static> {
    inner: Rc<BondData<B>>,
}

impl<B: Nucleobase + 'static> Clone for StraightBond<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A non-owning reference to a straight bond.
pub struct WeakStraightBond<B: Nucleobase + 'static> {
    inner: Weak<BondData<B>>,
}

impl<B: Nucleobase + 'static> Clone for WeakStraightBond<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Nucleobase + 'static> WeakStraightBond<B> {
    pub fn upgrade(&self) -> Option<StraightBond<B>> {
        self.inner.upgrade().map(|inner| StraightBond { inner })
    }
}

/// A field that `StraightBond::set` or `StraightBond::set_attributes` could not apply.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    NotAnObject(String),
    InvalidAttribute(AttributeError),
    UnsupportedAttributeValue(String),
    NotAFiniteNumber(String),
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject(field) => write!(f, "{} must be an object", field),
            Self::InvalidAttribute(e) => write!(f, "{}", e),
            Self::UnsupportedAttributeValue(name) => {
                write!(f, "Unsupported value for attribute {}", name)
            }
            Self::NotAFiniteNumber(field) => write!(f, "{} must be a finite number", field),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<AttributeError> for FieldError {
    fn from(e: AttributeError) -> Self {
        Self::InvalidAttribute(e)
    }
}

impl<B: Nucleobase + 'static> StraightBond<B> {
    /// Creates a new straight bond connecting bases 1 and 2, with the usual default values.
    pub fn between(base1: Rc<B>, base2: Rc<B>) -> Self {
        Self::between_with_defaults(base1, base2, &StraightBondDefaults::default())
    }

    /// Creates a new straight bond connecting bases 1 and 2.
    ///
    /// The new bond is given a UUID and the default values, and is positioned.
    pub fn between_with_defaults(
        base1: Rc<B>,
        base2: Rc<B>,
        defaults: &StraightBondDefaults,
    ) -> Self {
        let ret = Self::new(Element::line(), base1, base2);
        ret.assign_uuid();
        for (name, value) in defaults.attributes.iter() {
            if let Err(e) = ret.set_attribute(name, value.as_str()) {
                log::warn!("Ignoring default attribute: {}", e);
            }
        }
        ret.set_base_padding1(defaults.base_padding1);
        ret.set_base_padding2(defaults.base_padding2);

        // to make sure that the new bond is positioned even if the defaults were all ignored
        ret.reposition();
        ret
    }

    /// Makes a straight bond of an existing line element. No default value is applied.
    ///
    /// The base paddings are the current distances between the end points of the line and the
    /// centers of the bases.
    pub fn new(line: Element, base1: Rc<B>, base2: Rc<B>) -> Self {
        // read the coordinates of the line directly, its length cannot be queried before it is
        // rendered
        let (point1, point2) = line::end_points(&line);
        let inner = Rc::new(BondData {
            base_padding1: Cell::new(distance(point1, base1.center_point())),
            base_padding2: Cell::new(distance(point2, base2.center_point())),
            line,
            base1,
            base2,
            repositioned: Listeners::new(),
            base_subscriptions: RefCell::new(Vec::new()),
        });

        let subscriptions = [&inner.base1, &inner.base2]
            .iter()
            .map(|base| {
                let bond = Rc::downgrade(&inner);
                base.on_move(Rc::new(move || {
                    if let Some(bond) = bond.upgrade() {
                        bond.reposition()
                    }
                }))
            })
            .collect();
        *inner.base_subscriptions.borrow_mut() = subscriptions;

        Self { inner }
    }

    pub fn base1(&self) -> &Rc<B> {
        &self.inner.base1
    }

    pub fn base2(&self) -> &Rc<B> {
        &self.inner.base2
    }

    /// Bases 1 and 2, in that order.
    pub fn base_pair(&self) -> (Rc<B>, Rc<B>) {
        (self.inner.base1.clone(), self.inner.base2.clone())
    }

    /// The line element that is the straight bond.
    pub fn dom_node(&self) -> &Element {
        &self.inner.line
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.inner.line.get_attribute(name)
    }

    pub fn set_attribute<V: Into<String>>(&self, name: &str, value: V) -> Result<(), AttributeError> {
        self.inner.line.set_attribute(name, value)
    }

    /// Sets attributes from an object of values keyed by attribute name.
    ///
    /// Strings, numbers and booleans are set, `null` removes the attribute. Invalid entries are
    /// skipped and returned, the other entries are still applied. Input that is not an object is
    /// ignored.
    pub fn set_attributes(&self, attributes: &Value) -> Vec<FieldError> {
        let attributes = match attributes.as_object() {
            Some(attributes) => attributes,
            None => return vec![FieldError::NotAnObject(String::from("attributes"))],
        };
        let mut errors = Vec::new();
        for (name, value) in attributes.iter() {
            let result = match value {
                Value::String(s) => self.set_attribute(name, s.as_str()),
                Value::Number(n) => self.set_attribute(name, n.to_string()),
                Value::Bool(b) => self.set_attribute(name, b.to_string()),
                Value::Null => {
                    self.inner.line.remove_attribute(name);
                    Ok(())
                }
                Value::Array(_) | Value::Object(_) => {
                    errors.push(FieldError::UnsupportedAttributeValue(name.clone()));
                    continue;
                }
            };
            if let Err(e) = result {
                errors.push(e.into());
            }
        }
        errors
    }

    /// The id of the line element that is the straight bond. Empty if it has none.
    pub fn id(&self) -> String {
        self.inner.line.id()
    }

    /// Gives a new UUID to the straight bond, overwriting its previous id.
    pub fn assign_uuid(&self) {
        assign_uuid(&self.inner.line)
    }

    pub fn append_to(&self, container: &Element) -> Result<(), HierarchyError> {
        container.append_child(&self.inner.line)
    }

    /// Detaches the line element from its parent.
    pub fn remove(&self) {
        self.inner.line.remove()
    }

    /// True if the line element is a descendant of `container`. False if `container` is the line
    /// element itself.
    pub fn is_in(&self, container: &Element) -> bool {
        container.contains(&self.inner.line) && *container != self.inner.line
    }

    pub fn has_parent(&self) -> bool {
        self.inner.line.parent().is_some()
    }

    /// Fails if the straight bond is not part of a rendered document.
    pub fn get_total_length(&self) -> Result<f64, RenderError> {
        line::total_length(&self.inner.line)
    }

    /// The point at distance `length` from point 1, going towards point 2.
    ///
    /// Fails if the straight bond is not part of a rendered document.
    pub fn get_point_at_length(&self, length: f64) -> Result<Point, RenderError> {
        line::point_at_length(&self.inner.line, length)
    }

    /// The end of the line on the side of base 1.
    pub fn point1(&self) -> Point {
        line::end_points(&self.inner.line).0
    }

    /// The end of the line on the side of base 2.
    pub fn point2(&self) -> Point {
        line::end_points(&self.inner.line).1
    }

    pub fn base_padding1(&self) -> f64 {
        self.inner.base_padding1.get()
    }

    pub fn base_padding2(&self) -> f64 {
        self.inner.base_padding2.get()
    }

    /// Sets base padding 1 as is and repositions the bond.
    pub fn store_base_padding1(&self, base_padding1: f64) {
        self.inner.base_padding1.set(base_padding1);
        self.reposition();
    }

    /// Sets base padding 2 as is and repositions the bond.
    pub fn store_base_padding2(&self, base_padding2: f64) {
        self.inner.base_padding2.set(base_padding2);
        self.reposition();
    }

    /// Values that are not finite are ignored. Negative values are clamped to zero.
    pub fn set_base_padding1(&self, base_padding1: f64) {
        if base_padding1.is_finite() {
            self.store_base_padding1(base_padding1.max(0.));
        }
    }

    /// Values that are not finite are ignored. Negative values are clamped to zero.
    pub fn set_base_padding2(&self, base_padding2: f64) {
        if base_padding2.is_finite() {
            self.store_base_padding2(base_padding2.max(0.));
        }
    }

    /// True if the base paddings add up to more than the distance between the centers of the
    /// bases, in which case the two end points of the line have crossed.
    pub fn is_inverted(&self) -> bool {
        let bases_distance = distance(
            self.inner.base1.center_point(),
            self.inner.base2.center_point(),
        );
        self.base_padding1() + self.base_padding2() > bases_distance
    }

    /// Sets values of the straight bond from an object that may contain an `attributes` object
    /// and the `basePadding1` and `basePadding2` numbers.
    ///
    /// Each field is applied independently of the others. The fields that could not be applied
    /// are returned.
    pub fn set(&self, values: &Value) -> Vec<FieldError> {
        let values = match values.as_object() {
            Some(values) => values,
            None => return vec![FieldError::NotAnObject(String::from("values"))],
        };
        let mut errors = Vec::new();

        if let Some(attributes) = values.get("attributes").filter(|a| !a.is_null()) {
            errors.extend(self.set_attributes(attributes));
        }

        let mut padding = |name: &str| match values.get(name) {
            None => None,
            Some(value) => {
                let finite = value.as_f64().filter(|v| v.is_finite());
                if finite.is_none() {
                    errors.push(FieldError::NotAFiniteNumber(name.to_string()));
                }
                finite
            }
        };
        let base_padding1 = padding("basePadding1");
        let base_padding2 = padding("basePadding2");
        if let Some(base_padding1) = base_padding1 {
            self.set_base_padding1(base_padding1);
        }
        if let Some(base_padding2) = base_padding2 {
            self.set_base_padding2(base_padding2);
        }

        if !errors.is_empty() {
            log::warn!(
                "Ignored {} value(s) of straight bond {:?}: {:?}",
                errors.len(),
                self.id(),
                errors
            );
        }
        errors
    }

    /// Recomputes the end points of the line from the centers of the bases and the base paddings.
    pub fn reposition(&self) {
        self.inner.reposition()
    }

    /// Registers a listener called after each reposition of the bond.
    pub fn on_reposition(&self, listener: Listener) -> Subscription {
        self.inner.repositioned.add(listener)
    }

    /// Stops following the moves of the bases.
    pub fn dispose(&self) {
        self.inner.base_subscriptions.borrow_mut().clear();
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// A key identifying the bond among the live bonds.
    pub(crate) fn key(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub fn downgrade(&self) -> WeakStraightBond<B> {
        WeakStraightBond {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// The saved form of the straight bond.
    ///
    /// Fails if the bond or one of its bases has no id.
    pub fn serialized(&self) -> Result<SavedStraightBond, SerializationError> {
        let id = self.id();
        if id.is_empty() {
            return Err(SerializationError::MissingId);
        }
        let base_id1 = self.inner.base1.id();
        if base_id1.is_empty() {
            return Err(SerializationError::MissingBaseId1);
        }
        let base_id2 = self.inner.base2.id();
        if base_id2.is_empty() {
            return Err(SerializationError::MissingBaseId2);
        }
        Ok(SavedStraightBond {
            id,
            base_id1,
            base_id2,
            base_padding1: Some(self.base_padding1()),
            base_padding2: Some(self.base_padding2()),
        })
    }

    /// Recreates a saved straight bond of `parent_drawing`, in its current or in a legacy form.
    pub fn deserialized<D>(saved: &Value, parent_drawing: &D) -> Result<Self, DeserializationError>
    where
        D: Drawing<Base = B>,
    {
        let saved = SavedStraightBond::from_value(saved)?;
        Self::from_saved(&saved, parent_drawing)
    }

    /// Binds a saved straight bond to its line element and its bases in `parent_drawing`.
    pub fn from_saved<D>(
        saved: &SavedStraightBond,
        parent_drawing: &D,
    ) -> Result<Self, DeserializationError>
    where
        D: Drawing<Base = B>,
    {
        let line = parent_drawing
            .dom_node()
            .get_element_by_id(&saved.id)
            .ok_or_else(|| DeserializationError::LineNotFound(saved.id.clone()))?;
        if !line.is_line() {
            return Err(DeserializationError::NotALine {
                id: saved.id.clone(),
                tag_name: line.tag_name(),
            });
        }
        let base1 = parent_drawing
            .base_by_id(&saved.base_id1)
            .ok_or_else(|| DeserializationError::BaseNotFound(saved.base_id1.clone()))?;
        let base2 = parent_drawing
            .base_by_id(&saved.base_id2)
            .ok_or_else(|| DeserializationError::BaseNotFound(saved.base_id2.clone()))?;

        let ret = Self::new(line, base1, base2);
        if let Some(base_padding1) = saved.base_padding1 {
            ret.store_base_padding1(base_padding1);
        }
        if let Some(base_padding2) = saved.base_padding2 {
            ret.store_base_padding2(base_padding2);
        }
        Ok(ret)
    }
}

impl<B: Nucleobase + 'static> Bond for StraightBond<B> {
    type Base = B;

    fn base1(&self) -> &Rc<B> {
        &self.inner.base1
    }

    fn base2(&self) -> &Rc<B> {
        &self.inner.base2
    }
}

impl<B: Nucleobase + 'static> std::fmt::Debug for StraightBond<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StraightBond")
            .field("id", &self.id())
            .field("base_id1", &self.inner.base1.id())
            .field("base_id2", &self.inner.base2.id())
            .field("base_padding1", &self.base_padding1())
            .field("base_padding2", &self.base_padding2())
            .finish()
    }
}
