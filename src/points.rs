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
//! Two-dimensional points.
use ultraviolet::DVec2;

/// A point of the drawing.
pub type Point = DVec2;

pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).mag()
}

/// The angle, in radians, of the vector going from `a` to `b`.
pub fn direction(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}
