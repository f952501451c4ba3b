//! In-memory package store
//!
//! Owns the entry-name to byte-content mapping for one open bundle. All
//! editing operates on this map; nothing is written back to disk until
//! export. Entries are kept in a sorted map so listing, bulk replace, and
//! export all see the same deterministic order.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

/// Preallocation ceiling for entry reads. The declared uncompressed size in
/// the central directory is untrusted, so buffers start at most this large
/// and grow on demand while reading.
const PREALLOC_CAP: usize = 64 * 1024;

fn read_capacity(declared: u64) -> usize {
    declared.min(PREALLOC_CAP as u64) as usize
}

/// Entry-name to raw-bytes mapping for one open archive
#[derive(Debug, Default, Clone)]
pub struct PackageStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl PackageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a bundle from disk
    ///
    /// # Example
    /// ```no_run
    /// use vsixedit::PackageStore;
    /// let store = PackageStore::open_path("extension.vsix")?;
    /// # Ok::<(), vsixedit::Error>(())
    /// ```
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut store = Self::new();
        store.load(file)?;
        Ok(store)
    }

    /// Replace the store contents with the entries of a ZIP archive
    ///
    /// Raw bytes are stored verbatim so untouched entries round-trip
    /// byte-identical through export. Directory entries and entries with
    /// empty names are skipped. The swap happens only after the whole
    /// archive decodes; on failure the prior contents are left unchanged.
    ///
    /// # Errors
    /// Returns [`Error::CorruptArchive`] if the byte stream is not a valid
    /// ZIP container or an entry cannot be read.
    pub fn load<R: Read + Seek>(&mut self, reader: R) -> Result<()> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::CorruptArchive(e.to_string()))?;

        let mut entries = BTreeMap::new();

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| Error::CorruptArchive(format!("Failed to read entry: {}", e)))?;

            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            if name.is_empty() {
                continue;
            }

            let mut data = Vec::with_capacity(read_capacity(entry.size()));
            entry
                .read_to_end(&mut data)
                .map_err(|e| Error::CorruptArchive(format!("Failed to read {}: {}", name, e)))?;

            entries.insert(name, data);
        }

        self.entries = entries;
        Ok(())
    }

    /// Get an entry's raw bytes
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(|b| b.as_slice())
    }

    /// Replace an entry's bytes, or create the entry if it does not exist
    ///
    /// This is the only mutation path; the replacement is all-or-nothing.
    pub fn set(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }

    /// Check whether an entry exists
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove an entry, returning its bytes if it existed
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }

    /// Iterate entry names in sorted order
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Iterate (name, bytes) pairs in sorted name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of entries in the store
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
