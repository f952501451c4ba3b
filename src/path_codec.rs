//! JSON path addressing
//!
//! Converts between a document tree and a flat set of address/value rows,
//! and performs writes back into a live tree by address.
//!
//! ## Address Grammar
//!
//! An address is a sequence of steps concatenated left to right:
//! - a leading bare identifier is the first map key (no dot prefix)
//! - `.name` selects a map key
//! - `[i]` selects a 0-based sequence index
//!
//! Example: `contributes.commands[2].title`
//!
//! Map keys containing literal `.`, `[`, or `]` characters produce ambiguous
//! addresses and are not supported; no escaping scheme is applied.

use serde_json::Value;

use crate::error::{Error, Result};

/// One navigation step within a document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Map key lookup (`.name`)
    Key(String),
    /// 0-based sequence index (`[i]`)
    Index(usize),
}

/// One addressable scalar leaf: its address paired with its value
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    /// Address of the leaf within the document tree
    pub address: String,
    /// The scalar value at that address
    pub value: Value,
}

/// Flatten a document tree into address/value rows
///
/// Depth-first traversal in map insertion order and sequence order. A scalar
/// at the tree root yields a single row with the empty address; an empty map
/// or sequence root yields no rows. Row order follows traversal order;
/// callers sort by address for display.
///
/// # Example
/// ```
/// use serde_json::json;
/// use vsixedit::path_codec::flatten;
///
/// let rows = flatten(&json!({"a": {"b": [1, 2]}}));
/// assert_eq!(rows[0].address, "a.b[0]");
/// assert_eq!(rows[1].address, "a.b[1]");
/// ```
pub fn flatten(tree: &Value) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    walk(String::new(), tree, &mut rows);
    rows
}

fn walk(prefix: String, value: &Value, rows: &mut Vec<FlatRow>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let address = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                walk(address, child, rows);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(format!("{}[{}]", prefix, i), child, rows);
            }
        }
        scalar => rows.push(FlatRow {
            address: prefix,
            value: scalar.clone(),
        }),
    }
}

/// Parse an address string into its navigation steps
///
/// The empty address parses to zero steps (the scalar-root case).
///
/// # Errors
/// Returns [`Error::MalformedAddress`] on unbalanced brackets, non-numeric
/// indices, or text following a `]` without a `.` or `[` separator.
pub fn parse_address(address: &str) -> Result<Vec<PathStep>> {
    let bytes = address.as_bytes();
    let mut steps = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                i += 1;
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b'.' | b'[' | b']') {
                    i += 1;
                }
                // Slicing at '.'/'['/']' positions is safe: all are
                // single-byte ASCII and never occur inside a multi-byte
                // UTF-8 sequence.
                steps.push(PathStep::Key(address[start..i].to_string()));
            }
            b'[' => {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != b']' {
                    i += 1;
                }
                if i == bytes.len() {
                    return Err(Error::MalformedAddress(address.to_string()));
                }
                let index = address[start..i]
                    .parse::<usize>()
                    .map_err(|_| Error::MalformedAddress(address.to_string()))?;
                steps.push(PathStep::Index(index));
                i += 1; // skip ]
            }
            b']' => return Err(Error::MalformedAddress(address.to_string())),
            _ => {
                // Bare identifier is only valid as the first step
                if !steps.is_empty() {
                    return Err(Error::MalformedAddress(address.to_string()));
                }
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b'.' | b'[' | b']') {
                    i += 1;
                }
                steps.push(PathStep::Key(address[start..i].to_string()));
            }
        }
    }

    Ok(steps)
}

/// Write a value into a tree at the given address
///
/// Walks all steps but the last to locate the parent container, then sets the
/// final key or index. Writing a map or sequence at a previously-scalar
/// address is permitted and replaces the leaf with a subtree. The empty
/// address replaces the tree root.
///
/// # Errors
/// Returns [`Error::MalformedAddress`] if the address does not parse, or
/// [`Error::AddressNotFound`] if an intermediate step does not resolve to a
/// container of the expected kind. No mutation occurs on failure.
pub fn write_at(tree: &mut Value, address: &str, value: Value) -> Result<()> {
    let steps = parse_address(address)?;

    let Some((last, parents)) = steps.split_last() else {
        *tree = value;
        return Ok(());
    };

    let mut node = &mut *tree;
    for step in parents {
        node = resolve_step_mut(node, step)
            .ok_or_else(|| Error::AddressNotFound(address.to_string()))?;
    }

    match last {
        PathStep::Key(key) => match node {
            Value::Object(map) => {
                map.insert(key.clone(), value);
            }
            _ => return Err(Error::AddressNotFound(address.to_string())),
        },
        PathStep::Index(i) => match node {
            Value::Array(items) => {
                let slot = items
                    .get_mut(*i)
                    .ok_or_else(|| Error::AddressNotFound(address.to_string()))?;
                *slot = value;
            }
            _ => return Err(Error::AddressNotFound(address.to_string())),
        },
    }

    Ok(())
}

fn resolve_step_mut<'a>(node: &'a mut Value, step: &PathStep) -> Option<&'a mut Value> {
    match step {
        PathStep::Key(key) => node.as_object_mut()?.get_mut(key),
        PathStep::Index(i) => node.as_array_mut()?.get_mut(*i),
    }
}

/// Interpret user-entered text as a JSON value, falling back to a string
///
/// This is the two-branch coercion rule behind value editing: `42` becomes a
/// number, `true` a boolean, `"x"` a string, `{"a":1}` a nested map, and
/// anything that fails to parse as JSON is kept verbatim as a plain string.
pub fn coerce_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
