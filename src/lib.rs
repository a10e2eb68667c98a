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
//! Bonds of nucleic acid structure drawings.
//!
//! A `StraightBond` is a line element connecting two bases. It follows the moves of its bases,
//! keeping its end points at a fixed distance (the base paddings) from the centers of the bases.
//! A `MissingPrimaryBondsAdder` watches a drawing and adds the primary bonds that are missing
//! between consecutive bases, and an `InvertedStraightBondsHider` hides the bonds whose base
//! paddings add up to more than the distance between their bases.
#[macro_use]
extern crate serde_derive;
extern crate serde;

pub use rnacanvas_svg;
pub use ultraviolet;

mod defaults;
pub mod drawing;
pub mod events;
mod inverted_straight_bonds_hider;
mod missing_primary_bonds_adder;
pub mod nucleobase;
pub mod points;
mod saved;
mod straight_bond;

pub use defaults::StraightBondDefaults;
pub use drawing::{Bond, Drawing, DrawingLoadError, SavedBase, SavedDrawing, SvgDrawing};
pub use events::{Listener, Listeners, Subscription};
pub use inverted_straight_bonds_hider::InvertedStraightBondsHider;
pub use missing_primary_bonds_adder::{add_missing_primary_bonds, MissingPrimaryBondsAdder};
pub use nucleobase::{BaseMarker, Nucleobase, TrackablePoint};
pub use points::Point;
pub use saved::{DeserializationError, SavedStraightBond, SerializationError};
pub use straight_bond::{FieldError, StraightBond, WeakStraightBond};

#[cfg(test)]
mod tests;
