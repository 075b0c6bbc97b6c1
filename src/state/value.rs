//! Form value tree

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::Result;

/// A nested mapping of field values.
///
/// Scalars sit at the leaves and `Map` nodes give dotted keys their
/// structure. Arrays are not representable on purpose: deserializing a JSON
/// array fails.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Map(BTreeMap<String, FormValue>),
}

impl FormValue {
    /// An empty mapping, the usual root of a form
    pub fn map() -> Self {
        FormValue::Map(BTreeMap::new())
    }

    /// Build a tree from a JSON document
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    /// Whether the value counts as present for `required` checks.
    ///
    /// Empty text, zero, `NaN`, `false` and `Null` are all missing.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormValue::Null => false,
            FormValue::Bool(b) => *b,
            FormValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FormValue::Text(s) => !s.is_empty(),
            FormValue::Map(_) => true,
        }
    }

    /// Text rendering used for display and for length checks
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FormValue::Null | FormValue::Map(_) => Cow::Borrowed(""),
            FormValue::Bool(b) => Cow::Owned(b.to_string()),
            FormValue::Number(n) => Cow::Owned(n.to_string()),
            FormValue::Text(s) => Cow::Borrowed(s),
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FormValue>> {
        match self {
            FormValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Read the value at a dotted key
    pub fn get_path(&self, key: &str) -> Option<&FormValue> {
        super::path::get(self, key)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(n as f64)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
