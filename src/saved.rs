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
//! The saved form of straight bonds.
//!
//! Older drawings saved the id of the line of a bond under `lineId` and the ids of its bases
//! under `baseId1` and `baseId2`. Saved bonds are read in a raw form that accepts both spellings
//! and are then normalized into a `SavedStraightBond`.
use serde_json::Value;

/// A straight bond as it is stored in saved drawings.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SavedStraightBond {
    pub id: String,
    #[serde(rename = "baseID1")]
    pub base_id1: String,
    #[serde(rename = "baseID2")]
    pub base_id2: String,
    /// Allows base paddings to be restored exactly. When missing, the padding is computed from
    /// the position of the line.
    #[serde(rename = "basePadding1", skip_serializing_if = "Option::is_none")]
    pub base_padding1: Option<f64>,
    #[serde(rename = "basePadding2", skip_serializing_if = "Option::is_none")]
    pub base_padding2: Option<f64>,
}

#[derive(Deserialize)]
struct RawSavedStraightBond {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "lineId")]
    line_id: Option<Value>,
    #[serde(default, rename = "baseID1")]
    base_id1: Option<Value>,
    #[serde(default, rename = "baseId1")]
    legacy_base_id1: Option<Value>,
    #[serde(default, rename = "baseID2")]
    base_id2: Option<Value>,
    #[serde(default, rename = "baseId2")]
    legacy_base_id2: Option<Value>,
    #[serde(default, rename = "basePadding1")]
    base_padding1: Option<Value>,
    #[serde(default, rename = "basePadding2")]
    base_padding2: Option<Value>,
}

/// The first of `current` and `legacy` that is set to a non-null value.
fn current_or_legacy(current: Option<Value>, legacy: Option<Value>) -> Option<Value> {
    current.filter(|v| !v.is_null()).or(legacy)
}

/// A non-empty string, or `None`.
fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

impl RawSavedStraightBond {
    fn normalized(self) -> Result<SavedStraightBond, DeserializationError> {
        let id = non_empty_string(current_or_legacy(self.id, self.line_id))
            .ok_or(DeserializationError::MissingId)?;
        let base_id1 = non_empty_string(current_or_legacy(self.base_id1, self.legacy_base_id1))
            .ok_or(DeserializationError::MissingBaseId1)?;
        let base_id2 = non_empty_string(current_or_legacy(self.base_id2, self.legacy_base_id2))
            .ok_or(DeserializationError::MissingBaseId2)?;
        Ok(SavedStraightBond {
            id,
            base_id1,
            base_id2,
            base_padding1: self.base_padding1.as_ref().and_then(Value::as_f64),
            base_padding2: self.base_padding2.as_ref().and_then(Value::as_f64),
        })
    }
}

impl SavedStraightBond {
    /// Reads a saved straight bond in its current or in a legacy form.
    pub fn from_value(value: &Value) -> Result<Self, DeserializationError> {
        if !value.is_object() {
            return Err(DeserializationError::NotAnObject);
        }
        let raw: RawSavedStraightBond = serde_json::from_value(value.clone())
            .map_err(|e| DeserializationError::Malformed(e.to_string()))?;
        raw.normalized()
    }

    pub fn to_value(&self) -> Value {
        // serializing this structure cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl<'de> serde::Deserialize<'de> for SavedStraightBond {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <RawSavedStraightBond as serde::Deserialize>::deserialize(deserializer)?
            .normalized()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SerializationError {
    /// The line of the bond has no id.
    MissingId,
    MissingBaseId1,
    MissingBaseId2,
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "Straight bond has no ID."),
            Self::MissingBaseId1 => write!(f, "Base 1 has no ID."),
            Self::MissingBaseId2 => write!(f, "Base 2 has no ID."),
        }
    }
}

impl std::error::Error for SerializationError {}

#[derive(Debug, Clone, PartialEq)]
pub enum DeserializationError {
    NotAnObject,
    Malformed(String),
    MissingId,
    LineNotFound(String),
    NotALine { id: String, tag_name: String },
    MissingBaseId1,
    MissingBaseId2,
    BaseNotFound(String),
}

impl std::fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "Saved straight bond must be an object."),
            Self::Malformed(e) => write!(f, "Malformed saved straight bond: {}", e),
            Self::MissingId => write!(f, "Straight bond ID is missing."),
            Self::LineNotFound(id) => write!(f, "Unable to find straight bond DOM node {}.", id),
            Self::NotALine { id, tag_name } => write!(
                f,
                "Straight bond DOM node {} must be a line element, not <{}>.",
                id, tag_name
            ),
            Self::MissingBaseId1 => write!(f, "Missing base 1 ID."),
            Self::MissingBaseId2 => write!(f, "Missing base 2 ID."),
            Self::BaseNotFound(id) => write!(f, "Unable to find base {}.", id),
        }
    }
}

impl std::error::Error for DeserializationError {}
