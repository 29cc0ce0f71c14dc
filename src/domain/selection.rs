//! Customer selection model
//!
//! What the customer picked for a product's customizable fields, keyed by
//! `field_name`. The value shape depends on the field type; mismatched
//! shapes are tolerated and simply price to zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from `field_name` to the customer's chosen value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerSelection(HashMap<String, FieldValue>);

impl CustomerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field_name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field_name, value);
        self
    }

    pub fn set(&mut self, field_name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field_name.into(), value.into());
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.0.get(field_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

/// A selected value; shape depends on the field type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// toggle / file presence flag
    Flag(bool),
    /// dropdown / color / design option name, engraving text, or an
    /// uploaded-asset reference for file fields
    Text(String),
    /// multi-select option names
    Choices(Vec<String>),
    /// dimensions in centimeters
    Dimensions(Dimensions),
}

impl FieldValue {
    /// Blank values never contribute to pricing: an unchecked toggle, an
    /// empty string, an empty multi-select.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Flag(on) => !on,
            Self::Text(text) => text.trim().is_empty(),
            Self::Choices(names) => names.is_empty(),
            Self::Dimensions(_) => false,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::Choices(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Choices(value.into_iter().map(String::from).collect())
    }
}

impl From<Dimensions> for FieldValue {
    fn from(value: Dimensions) -> Self {
        Self::Dimensions(value)
    }
}

/// Chosen dimensions in centimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: Decimal,
    #[serde(default)]
    pub height: Decimal,
    #[serde(default)]
    pub depth: Decimal,
}

impl Dimensions {
    pub fn new(width: Decimal, height: Decimal, depth: Decimal) -> Self {
        Self { width, height, depth }
    }
}
