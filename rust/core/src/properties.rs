// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element property sets as returned by the viewer.
//!
//! A property set is an ordered mapping from property name to value. Values
//! arrive loosely typed: scalars, `null`, lists of references, or wrapper
//! objects such as `{"type": 1, "value": "Wall-01"}`. [`PropertyValue`] keeps
//! just enough structure to produce a display string.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// Keys holding auxiliary data rather than displayable properties.
pub const RESERVED_KEYS: [&str; 3] = ["mats", "psets", "type"];

/// Placeholder shown for missing or malformed values.
pub const PLACEHOLDER: &str = "-";

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `null` or `undefined`
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<PropertyValue>),
    /// Object exposing a `value` member
    Wrapped(Box<PropertyValue>),
    /// Any other object
    Object,
}

impl PropertyValue {
    /// Resolves the string shown in the property panel.
    pub fn display(&self) -> String {
        match self {
            PropertyValue::Null | PropertyValue::Object => PLACEHOLDER.to_string(),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Number(n) => format_number(*n),
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::List(items) => items
                .iter()
                .map(PropertyValue::display)
                .collect::<Vec<_>>()
                .join(","),
            PropertyValue::Wrapped(inner) => inner.display(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

/// Same string form as JavaScript's `String(n)`: integral values without a
/// fraction, exponent notation outside `1e-6 ..= 1e21`.
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }
    let exponent = format!("{:e}", n);
    match exponent.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponent,
    }
}

struct PropertyValueVisitor;

impl<'de> Visitor<'de> for PropertyValueVisitor {
    type Value = PropertyValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a property value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        PropertyValue::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(PropertyValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PropertyValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(PropertyValue::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<PropertyValue>()? {
            items.push(item);
        }
        Ok(PropertyValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut wrapped = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "value" {
                wrapped = Some(map.next_value::<PropertyValue>()?);
            } else {
                map.next_value::<de::IgnoredAny>()?;
            }
        }
        Ok(match wrapped {
            Some(inner) => PropertyValue::Wrapped(Box::new(inner)),
            None => PropertyValue::Object,
        })
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PropertyValueVisitor)
    }
}

/// Ordered property mapping of one element.
///
/// Keys keep the order the viewer produced them in. A repeated key replaces
/// the earlier value at its original position.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: IndexMap<String, PropertyValue>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, replacing the value in place if the name exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Builder-style [`PropertySet::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Splits off reserved entries (materials, property-set groupings,
    /// element type), returning the displayable remainder and the auxiliary
    /// data. Order is preserved on both sides.
    pub fn split_reserved(self) -> (PropertySet, AuxiliaryData) {
        let mut visible = IndexMap::with_capacity(self.entries.len());
        let mut auxiliary = AuxiliaryData::default();
        for (name, value) in self.entries {
            match name.as_str() {
                "mats" => auxiliary.materials = Some(value),
                "psets" => auxiliary.property_sets = Some(value),
                "type" => auxiliary.element_type = Some(value),
                _ => {
                    visible.insert(name, value);
                }
            }
        }
        (PropertySet { entries: visible }, auxiliary)
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PropertySet {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Reserved entries split off a property set before display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxiliaryData {
    pub materials: Option<PropertyValue>,
    pub property_sets: Option<PropertyValue>,
    pub element_type: Option<PropertyValue>,
}

impl AuxiliaryData {
    pub fn is_empty(&self) -> bool {
        self.materials.is_none() && self.property_sets.is_none() && self.element_type.is_none()
    }
}
