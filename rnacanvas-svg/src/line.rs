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
//! Length queries on line elements.
//!
//! Like in a browser, the length of a line can only be queried once the line is part of a
//! rendered document.
use super::Element;
use ultraviolet::DVec2;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The element is not a descendant of the root of a document.
    NotRendered,
    NotALine(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRendered => write!(f, "The element has not been added to a document"),
            Self::NotALine(tag) => write!(f, "Expected a line element, got <{}>", tag),
        }
    }
}

impl std::error::Error for RenderError {}

/// The end points of a line as given by its `x1`, `y1`, `x2` and `y2` attributes.
pub fn end_points(line: &Element) -> (DVec2, DVec2) {
    (
        DVec2::new(line.number_attribute("x1"), line.number_attribute("y1")),
        DVec2::new(line.number_attribute("x2"), line.number_attribute("y2")),
    )
}

fn rendered_end_points(line: &Element) -> Result<(DVec2, DVec2), RenderError> {
    if !line.is_line() {
        return Err(RenderError::NotALine(line.tag_name()));
    }
    if !line.is_rendered() {
        return Err(RenderError::NotRendered);
    }
    Ok(end_points(line))
}

pub fn total_length(line: &Element) -> Result<f64, RenderError> {
    let (a, b) = rendered_end_points(line)?;
    Ok((b - a).mag())
}

/// The point at distance `length` from the first end point, along the line.
///
/// `length` is clamped to the length of the line.
pub fn point_at_length(line: &Element, length: f64) -> Result<DVec2, RenderError> {
    let (a, b) = rendered_end_points(line)?;
    let total = (b - a).mag();
    if total == 0. || length.is_nan() {
        return Ok(a);
    }
    let t = length.max(0.).min(total) / total;
    Ok(a + (b - a) * t)
}
