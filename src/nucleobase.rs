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
//! The nucleobases that bonds are attached to.
use super::events::{Listener, Listeners, Subscription};
use super::points::Point;
use rnacanvas_svg::{assign_uuid, Element};
use std::cell::Cell;
use std::rc::Rc;

/// What a bond needs to know about the bases it connects.
pub trait Nucleobase {
    fn id(&self) -> String;

    fn center_point(&self) -> Point;

    /// Registers a listener that is called after each change of the x or y coordinate of the
    /// center point of the base.
    fn on_move(&self, listener: Listener) -> Subscription;
}

/// A point that notifies its listeners whenever it moves.
pub struct TrackablePoint {
    x: Cell<f64>,
    y: Cell<f64>,
    move_listeners: Rc<Listeners>,
}

impl TrackablePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Cell::new(x),
            y: Cell::new(y),
            move_listeners: Listeners::new(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x.get()
    }

    pub fn y(&self) -> f64 {
        self.y.get()
    }

    pub fn get(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    pub fn set_x(&self, x: f64) {
        self.x.set(x);
        self.move_listeners.notify();
    }

    pub fn set_y(&self, y: f64) {
        self.y.set(y);
        self.move_listeners.notify();
    }

    /// Moves the point to `point`, notifying the listeners once.
    pub fn set(&self, point: Point) {
        self.x.set(point.x);
        self.y.set(point.y);
        self.move_listeners.notify();
    }

    pub fn on_move(&self, listener: Listener) -> Subscription {
        self.move_listeners.add(listener)
    }

    pub fn nb_listeners(&self) -> usize {
        self.move_listeners.len()
    }
}

impl Default for TrackablePoint {
    fn default() -> Self {
        Self::new(0., 0.)
    }
}

/// A base drawn as a `<text>` element centered on its center point.
///
/// The id of the base is the id of its text element, and the `x` and `y` attributes of the text
/// element follow the center point.
pub struct BaseMarker {
    text: Element,
    center_point: Rc<TrackablePoint>,
    _text_follows_center: Subscription,
}

impl BaseMarker {
    /// Creates a base with a new UUID, centered at the origin.
    pub fn create(character: &str) -> Rc<Self> {
        let text = Element::new("text");
        assign_uuid(&text);
        text.set_text_content(character);
        for (name, value) in [("text-anchor", "middle"), ("dominant-baseline", "central")] {
            // these names are valid
            let _ = text.set_attribute(name, value);
        }
        Self::from_text(text, Point::zero())
    }

    /// Wraps an existing text element, placing its center at `center`.
    pub fn from_text(text: Element, center: Point) -> Rc<Self> {
        let center_point = Rc::new(TrackablePoint::new(center.x, center.y));
        write_position(&text, center);

        let point = Rc::downgrade(&center_point);
        let follower = text.clone();
        let text_follows_center = center_point.on_move(Rc::new(move || {
            if let Some(point) = point.upgrade() {
                write_position(&follower, point.get());
            }
        }));

        Rc::new(Self {
            text,
            center_point,
            _text_follows_center: text_follows_center,
        })
    }

    pub fn dom_node(&self) -> &Element {
        &self.text
    }

    pub fn center_point(&self) -> &TrackablePoint {
        &self.center_point
    }

    pub fn text_content(&self) -> String {
        self.text.text_content().unwrap_or_default()
    }

    pub fn set_center(&self, center: Point) {
        self.center_point.set(center);
    }

    /// The number of listeners currently following the moves of the base.
    pub fn nb_move_listeners(&self) -> usize {
        // the text element's own listener is not counted
        self.center_point.nb_listeners() - 1
    }
}

fn write_position(text: &Element, center: Point) {
    let _ = text.set_attribute("x", center.x.to_string());
    let _ = text.set_attribute("y", center.y.to_string());
}

impl Nucleobase for BaseMarker {
    fn id(&self) -> String {
        self.text.id()
    }

    fn center_point(&self) -> Point {
        self.center_point.get()
    }

    fn on_move(&self, listener: Listener) -> Subscription {
        self.center_point.on_move(listener)
    }
}
