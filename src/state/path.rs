//! Dotted key access into a [`FormValue`] tree
//!
//! `"nested.objectProperty"` addresses the `objectProperty` entry of the
//! `nested` mapping. Every segment names one level of mapping; there are no
//! index segments.

use super::value::FormValue;
use crate::error::{FormError, Result};

fn segments(key: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(FormError::EmptySegment {
            key: key.to_string(),
        });
    }
    Ok(parts)
}

/// Read the value at `key`, or `None` if any segment is missing
pub fn get<'a>(tree: &'a FormValue, key: &str) -> Option<&'a FormValue> {
    let mut node = tree;
    for segment in segments(key).ok()? {
        node = node.as_map()?.get(segment)?;
    }
    Some(node)
}

/// Return a copy of `tree` with `value` stored at `key`.
///
/// Missing intermediate mappings (and `Null` placeholders) are created on
/// the way down. The caller's tree is left untouched.
pub fn set(tree: &FormValue, key: &str, value: FormValue) -> Result<FormValue> {
    let parts = segments(key)?;
    let mut root = tree.clone();
    write(&mut root, &parts, 0, key, value)?;
    Ok(root)
}

fn write(
    node: &mut FormValue,
    parts: &[&str],
    depth: usize,
    key: &str,
    value: FormValue,
) -> Result<()> {
    if matches!(node, FormValue::Null) {
        *node = FormValue::map();
    }
    let FormValue::Map(map) = node else {
        return Err(FormError::NotAMapping {
            key: key.to_string(),
            segment: parts[..depth].join("."),
        });
    };
    let segment = parts[depth].to_string();
    if depth + 1 == parts.len() {
        map.insert(segment, value);
        return Ok(());
    }
    let child = map.entry(segment).or_insert(FormValue::Null);
    write(child, parts, depth + 1, key, value)
}
