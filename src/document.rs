//! Structured-document cache and entry classification
//!
//! Mediates between an entry's raw bytes in the [`PackageStore`] and the
//! addressable JSON tree the editing surface works with. Classification is
//! by file extension only; content is never inspected to decide how an
//! entry is routed.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::path_codec::{self, FlatRow};
use crate::store::PackageStore;

/// Extensions parsed as JSON documents (`.code-snippets` is the VS Code
/// snippet format, a JSON superset that serde_json handles identically)
const STRUCTURED_EXTS: &[&str] = &["json", "code-snippets"];

const TEXT_EXTS: &[&str] = &["md", "markdown"];
const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "bmp", "webp"];
const CODE_EXTS: &[&str] = &["js", "ts", "tsx", "jsx", "css", "html", "htm"];

/// Coarse entry classification by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// JSON or snippet document, editable by address
    Structured,
    /// Markdown / free text
    Text,
    /// Image asset
    Image,
    /// Source or markup file shipped inside the bundle
    Code,
    /// Anything else (treated as opaque bytes)
    Other,
}

fn extension(name: &str) -> Option<&str> {
    let file = name.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    Some(ext)
}

/// Classify an entry by its name's extension
pub fn entry_kind(name: &str) -> EntryKind {
    let Some(ext) = extension(name) else {
        return EntryKind::Other;
    };
    let matches = |set: &[&str]| set.iter().any(|e| e.eq_ignore_ascii_case(ext));

    if matches(STRUCTURED_EXTS) {
        EntryKind::Structured
    } else if matches(TEXT_EXTS) {
        EntryKind::Text
    } else if matches(IMAGE_EXTS) {
        EntryKind::Image
    } else if matches(CODE_EXTS) {
        EntryKind::Code
    } else {
        EntryKind::Other
    }
}

/// Check whether an entry is recognized as a structured document
pub fn is_structured_document(name: &str) -> bool {
    entry_kind(name) == EntryKind::Structured
}

/// Decode bytes as UTF-8 for preview, or `None` for binary content
pub fn preview_text(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}

/// Render a tree to the canonical textual form
///
/// Two-space indentation, map keys in insertion order, non-ASCII characters
/// kept verbatim. Every write-back path uses this renderer so edited entries
/// always serialize identically.
pub fn to_canonical_string(tree: &Value) -> String {
    // Pretty-printing a Value cannot fail: keys are strings by construction
    serde_json::to_string_pretty(tree).unwrap_or_default()
}

/// Per-entry parsed-document cache
///
/// Holds at most one live tree per entry. In-memory edits accumulate on the
/// cached tree; [`DocumentCache::serialize`] is the only path by which they
/// become bytes in the store.
#[derive(Debug, Default)]
pub struct DocumentCache {
    trees: HashMap<String, Value>,
}

impl DocumentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an entry's current bytes and cache the tree
    ///
    /// On success any previously cached tree for the entry is replaced. A
    /// failed parse leaves the previously cached tree (if any) in place so
    /// unsaved edits survive a bad external write.
    ///
    /// # Errors
    /// [`Error::EntryNotFound`] if the entry does not exist,
    /// [`Error::Decode`] for non-UTF-8 bytes, or [`Error::Parse`] for
    /// malformed JSON.
    pub fn parse(&mut self, store: &PackageStore, name: &str) -> Result<&Value> {
        let bytes = store
            .get(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))?;

        let text =
            std::str::from_utf8(bytes).map_err(|_| Error::Decode(name.to_string()))?;

        let tree: Value = serde_json::from_str(text).map_err(|e| Error::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let slot = self.trees.entry(name.to_string()).or_insert(Value::Null);
        *slot = tree;
        Ok(slot)
    }

    /// Get the cached tree for an entry, if one is live
    pub fn tree(&self, name: &str) -> Option<&Value> {
        self.trees.get(name)
    }

    /// Get a mutable reference to the entry's tree, parsing it on first use
    ///
    /// Prefers the cached tree so unsaved edits stay visible; parses the
    /// entry's current bytes only when no tree is live.
    pub fn tree_mut(&mut self, store: &PackageStore, name: &str) -> Result<&mut Value> {
        if !self.trees.contains_key(name) {
            self.parse(store, name)?;
        }
        self.trees
            .get_mut(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))
    }

    /// Render the cached tree to canonical text and write it into the store
    ///
    /// # Errors
    /// [`Error::EntryNotFound`] if no tree is cached for the entry.
    pub fn serialize(&self, store: &mut PackageStore, name: &str) -> Result<()> {
        let tree = self
            .trees
            .get(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))?;

        store.set(name, to_canonical_string(tree).into_bytes());
        Ok(())
    }

    /// Flatten the entry's tree into rows, sorted by address
    pub fn rows(&mut self, store: &PackageStore, name: &str) -> Result<Vec<FlatRow>> {
        let tree = self.tree_mut(store, name)?;
        let mut rows = path_codec::flatten(tree);
        rows.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(rows)
    }

    /// Write user-entered text at an address within the entry's tree
    ///
    /// The text is coerced via [`path_codec::coerce_value`]: JSON literals
    /// keep their type, everything else becomes a plain string. The edit is
    /// in-memory only; call [`DocumentCache::serialize`] to persist it to
    /// the store.
    pub fn set_value(
        &mut self,
        store: &PackageStore,
        name: &str,
        address: &str,
        raw_text: &str,
    ) -> Result<()> {
        let value = path_codec::coerce_value(raw_text);
        let tree = self.tree_mut(store, name)?;
        path_codec::write_at(tree, address, value)
    }

    /// Drop the cached tree for an entry
    ///
    /// Callers that replace an entry's bytes outside of
    /// [`DocumentCache::serialize`] must invalidate so the next parse sees
    /// the new bytes.
    pub fn invalidate(&mut self, name: &str) {
        self.trees.remove(name);
    }

    /// Drop all cached trees
    pub fn clear(&mut self) {
        self.trees.clear();
    }
}
