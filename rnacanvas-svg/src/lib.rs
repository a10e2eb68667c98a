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
//! An in-memory SVG element tree.
//!
//! Elements are reference counted handles: cloning an `Element` gives another handle to the same
//! node. A node owns its children and keeps a weak reference to its parent. An element is
//! *rendered* when the root of its tree is the root of a `Document`, which is the only situation
//! in which length queries on lines succeed.
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

pub use ultraviolet;

mod id;
pub mod line;
mod markup;
mod mutation;

pub use id::{assign_uuid, ID_PREFIX};
pub use markup::ParseError;
pub use mutation::{
    deliver_mutation_records, MutationKind, MutationObserver, MutationRecord, ObserverOptions,
};

use mutation::Registration;

type ElementPtr = Rc<RefCell<ElementData>>;

struct ElementData {
    tag_name: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    parent: Weak<RefCell<ElementData>>,
    children: Vec<Element>,
    document_root: bool,
    registrations: Vec<Registration>,
}

/// A node of the SVG tree.
#[derive(Clone)]
pub struct Element(ElementPtr);

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Element")
            .field("tag_name", &data.tag_name)
            .field("attributes", &data.attributes)
            .field("children", &data.children.len())
            .finish()
    }
}

impl Element {
    pub fn new<S: Into<String>>(tag_name: S) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
            text: None,
            parent: Weak::new(),
            children: Vec::new(),
            document_root: false,
            registrations: Vec::new(),
        })))
    }

    pub fn line() -> Self {
        Self::new("line")
    }

    pub fn tag_name(&self) -> String {
        self.0.borrow().tag_name.clone()
    }

    pub fn is_line(&self) -> bool {
        self.0.borrow().tag_name == "line"
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.0.borrow().attributes.clone()
    }

    pub fn set_attribute<V: Into<String>>(&self, name: &str, value: V) -> Result<(), AttributeError> {
        if !is_valid_attribute_name(name) {
            return Err(AttributeError::InvalidName(name.to_string()));
        }
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.into());
        mutation::queue_attribute_record(self, name);
        Ok(())
    }

    /// Has no effect if the attribute is not set.
    pub fn remove_attribute(&self, name: &str) {
        let removed = self.0.borrow_mut().attributes.remove(name).is_some();
        if removed {
            mutation::queue_attribute_record(self, name);
        }
    }

    /// Reads an attribute as a length, the way the `baseVal` of an animated length is read.
    ///
    /// Missing or unparsable values are read as 0.
    pub fn number_attribute(&self, name: &str) -> f64 {
        self.get_attribute(name)
            .and_then(|v| parse_length(&v))
            .unwrap_or(0.)
    }

    /// The `id` attribute of the element, or an empty string if it has none.
    ///
    /// Reading the id never assigns one.
    pub fn id(&self) -> String {
        self.get_attribute("id").unwrap_or_default()
    }

    pub fn set_id<S: Into<String>>(&self, id: S) {
        // "id" is always a valid attribute name
        let _ = self.set_attribute("id", id);
    }

    pub fn text_content(&self) -> Option<String> {
        self.0.borrow().text.clone()
    }

    pub fn set_text_content<S: Into<String>>(&self, text: S) {
        self.0.borrow_mut().text = Some(text.into());
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.borrow().parent.upgrade().map(Element)
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// The topmost ancestor of the element (the element itself if it has no parent).
    pub fn root(&self) -> Element {
        let mut ret = self.clone();
        while let Some(parent) = ret.parent() {
            ret = parent;
        }
        ret
    }

    pub fn is_rendered(&self) -> bool {
        self.root().0.borrow().document_root
    }

    /// True if `other` is this element or one of its descendants.
    pub fn contains(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(element) = current {
            if element == *self {
                return true;
            }
            current = element.parent();
        }
        false
    }

    /// Appends `child` as the last child of this element, detaching it from its previous parent
    /// first.
    pub fn append_child(&self, child: &Element) -> Result<(), HierarchyError> {
        self.insert_child(child, None)
    }

    /// Inserts `child` before `reference`. If `reference` is `None` or is not a child of this
    /// element, `child` is appended.
    pub fn insert_before(
        &self,
        child: &Element,
        reference: Option<&Element>,
    ) -> Result<(), HierarchyError> {
        self.insert_child(child, reference)
    }

    fn insert_child(
        &self,
        child: &Element,
        reference: Option<&Element>,
    ) -> Result<(), HierarchyError> {
        if child.contains(self) {
            return Err(HierarchyError::CycleCreated);
        }
        if child.0.borrow().document_root {
            return Err(HierarchyError::DocumentRoot);
        }
        child.remove();

        {
            let mut data = self.0.borrow_mut();
            let position = reference
                .and_then(|r| data.children.iter().position(|c| c == r))
                .unwrap_or(data.children.len());
            data.children.insert(position, child.clone());
        }
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);

        mutation::queue_child_list_record(self, vec![child.clone()], vec![]);
        Ok(())
    }

    /// Detaches the element from its parent.
    ///
    /// Has no effect if the element has no parent.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| c != self);
            self.0.borrow_mut().parent = Weak::new();
            mutation::queue_child_list_record(&parent, vec![], vec![self.clone()]);
        }
    }

    /// Searches the descendants of the element (not the element itself) for an element with the
    /// given id.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        if id.is_empty() {
            return None;
        }
        for child in self.children() {
            if child.get_attribute("id").as_deref() == Some(id) {
                return Some(child);
            }
            if let Some(found) = child.get_element_by_id(id) {
                return Some(found);
            }
        }
        None
    }

    /// The element and its ancestors, starting from the element.
    fn inclusive_ancestors(&self) -> Vec<Element> {
        let mut ret = vec![self.clone()];
        let mut current = self.parent();
        while let Some(element) = current {
            current = element.parent();
            ret.push(element);
        }
        ret
    }

    fn downgrade(&self) -> Weak<RefCell<ElementData>> {
        Rc::downgrade(&self.0)
    }
}

/// A rendered SVG document.
///
/// Elements that are descendants of `Document::root` are rendered.
#[derive(Clone, Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new() -> Self {
        let root = Element::new("svg");
        root.0.borrow_mut().document_root = true;
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub(crate) fn from_root(root: Element) -> Self {
        root.0.borrow_mut().document_root = true;
        Self { root }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => (),
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeError {
    InvalidName(String),
}

impl std::fmt::Display for AttributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "Invalid attribute name: {:?}", name),
        }
    }
}

impl std::error::Error for AttributeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyError {
    /// The inserted element is the parent or one of its ancestors.
    CycleCreated,
    /// The root of a document cannot be inserted in another element.
    DocumentRoot,
}

impl std::fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleCreated => write!(f, "The new child contains the parent"),
            Self::DocumentRoot => write!(f, "The root of a document cannot be inserted"),
        }
    }
}

impl std::error::Error for HierarchyError {}
