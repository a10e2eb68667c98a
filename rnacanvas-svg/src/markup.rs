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
//! Conversion between element trees and SVG markup.
use super::*;
use svg::node::element::tag::Type;
use svg::parser::Event;
use svg::Node;

impl Element {
    /// The SVG markup of the element and its descendants.
    pub fn to_markup(&self) -> String {
        to_svg_node(self).to_string()
    }
}

fn to_svg_node(element: &Element) -> svg::node::element::Element {
    let mut ret = svg::node::element::Element::new(element.tag_name());
    for (name, value) in element.attributes() {
        ret.assign(name, escape_xml(&value));
    }
    if let Some(text) = element.text_content() {
        ret.append(svg::node::Text::new(escape_xml(&text)));
    }
    for child in element.children() {
        ret.append(to_svg_node(&child));
    }
    ret
}

impl Document {
    /// Builds a document from SVG markup.
    ///
    /// The first element of the markup becomes the root of the document.
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        for event in svg::read(markup)? {
            match event {
                Event::Tag(name, tag_type, attributes) => {
                    if matches!(tag_type, Type::End) {
                        stack.pop();
                        continue;
                    }
                    let element = Element::new(name);
                    for (attribute, value) in attributes.iter() {
                        element
                            .set_attribute(attribute, unescape_xml(value))
                            .map_err(ParseError::Attribute)?;
                    }
                    if let Some(parent) = stack.last() {
                        parent
                            .append_child(&element)
                            .map_err(ParseError::Hierarchy)?;
                    } else if root.is_none() {
                        root = Some(element.clone());
                    } else {
                        return Err(ParseError::MultipleRoots);
                    }
                    if matches!(tag_type, Type::Start) {
                        stack.push(element);
                    }
                }
                Event::Text(text) => {
                    let text = text.trim();
                    if let (false, Some(element)) = (text.is_empty(), stack.last()) {
                        element.set_text_content(unescape_xml(text));
                    }
                }
                Event::Error(error) => return Err(ParseError::SvgParserError(error)),
                _ => (),
            }
        }

        let root = root.ok_or(ParseError::NoRootElement)?;
        log::debug!("parsed document with {} children", root.child_count());
        Ok(Document::from_root(root))
    }
}

/// The `svg` crate writes text and attribute values as they are.
fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Replaces the predefined entities and the character references of `value`. Unknown or
/// malformed references are kept as they are.
fn unescape_xml(value: &str) -> String {
    let mut ret = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('&') {
        ret.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest
            .find(';')
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                ret.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                ret.push('&');
                rest = &rest[1..];
            }
        }
    }
    ret.push_str(rest);
    ret
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = reference
                .strip_prefix("#x")
                .or_else(|| reference.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                reference.strip_prefix('#')?.parse().ok()?
            };
            std::char::from_u32(code)
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    IOError(std::io::Error),
    SvgParserError(svg::parser::Error),
    Attribute(AttributeError),
    Hierarchy(HierarchyError),
    NoRootElement,
    MultipleRoots,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IOError(e) => write!(f, "Could not read markup: {}", e),
            Self::SvgParserError(e) => write!(f, "Invalid markup: {:?}", e),
            Self::Attribute(e) => write!(f, "{}", e),
            Self::Hierarchy(e) => write!(f, "{}", e),
            Self::NoRootElement => write!(f, "The markup contains no element"),
            Self::MultipleRoots => write!(f, "The markup contains several root elements"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

impl From<svg::parser::Error> for ParseError {
    fn from(e: svg::parser::Error) -> Self {
        Self::SvgParserError(e)
    }
}
