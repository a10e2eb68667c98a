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
//! Default values of newly created bonds.
use std::collections::BTreeMap;

/// Values applied to straight bonds created with `StraightBond::between`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StraightBondDefaults {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default = "default_base_padding")]
    pub base_padding1: f64,
    #[serde(default = "default_base_padding")]
    pub base_padding2: f64,
}

const DEFAULT_BASE_PADDING: f64 = 6.;

fn default_base_padding() -> f64 {
    DEFAULT_BASE_PADDING
}

impl Default for StraightBondDefaults {
    fn default() -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(String::from("stroke"), String::from("#000000"));
        attributes.insert(String::from("stroke-width"), String::from("2"));
        Self {
            attributes,
            base_padding1: DEFAULT_BASE_PADDING,
            base_padding2: DEFAULT_BASE_PADDING,
        }
    }
}

impl StraightBondDefaults {
    /// Reads default values from JSON. Missing paddings take their usual default value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The defaults in the form accepted by `StraightBond::set`.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "attributes": self.attributes,
            "basePadding1": self.base_padding1,
            "basePadding2": self.base_padding2,
        })
    }
}
