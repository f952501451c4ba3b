//! Archive export and version bump
//!
//! Writes the current store contents to a new ZIP container, optionally
//! bumping the manifest's patch version first. Export reads the store;
//! the bump is the only mutation it ever performs.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use regex::Regex;
use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::to_canonical_string;
use crate::error::{Error, Result};
use crate::store::PackageStore;

/// Manifest entries probed for a version bump, in order. VSIX bundles nest
/// the extension under `extension/`; the bare name covers repacked bundles.
pub const MANIFEST_NAMES: &[&str] = &["extension/package.json", "package.json"];

/// Increment the patch component of the bundle manifest's `version` field
///
/// Probes [`MANIFEST_NAMES`] and bumps the first entry present. Best-effort:
/// returns whether a bump happened and never fails export.
pub fn bump_patch_version(store: &mut PackageStore) -> bool {
    for name in MANIFEST_NAMES {
        if store.has(name) {
            return bump_entry_version(store, name);
        }
    }
    false
}

/// Increment the patch component of `version` in a specific manifest entry
///
/// Only the strict `major.minor.patch` integer-triplet form is recognized;
/// pre-release or build suffixes, a missing field, or a parse failure all
/// leave the entry untouched and return `false`.
pub fn bump_entry_version(store: &mut PackageStore, name: &str) -> bool {
    let Some(bytes) = store.get(name) else {
        return false;
    };
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    let Ok(mut tree) = serde_json::from_str::<Value>(text) else {
        return false;
    };
    let Some(version) = tree.get("version").and_then(Value::as_str) else {
        return false;
    };

    let Ok(pattern) = Regex::new(r"^(\d+)\.(\d+)\.(\d+)$") else {
        return false;
    };
    let Some(caps) = pattern.captures(version) else {
        return false;
    };

    // Component capture groups are all digits; parse still guards overflow
    let parts: Option<(u64, u64, u64)> = (|| {
        Some((
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        ))
    })();
    let Some((major, minor, patch)) = parts else {
        return false;
    };

    tree["version"] = Value::String(format!("{}.{}.{}", major, minor, patch + 1));
    store.set(name, to_canonical_string(&tree).into_bytes());
    true
}

/// Write every entry in the store to a new ZIP archive
///
/// Entries are written at their original names in sorted order with deflate
/// compression. The store is not mutated.
///
/// # Errors
/// Returns [`Error::Export`] if the sink cannot be written.
pub fn export<W: Write + Seek>(store: &PackageStore, sink: W) -> Result<()> {
    let mut writer = ZipWriter::new(sink);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in store.iter() {
        writer
            .start_file(name, options)
            .map_err(|e| Error::Export(format!("{}: {}", name, e)))?;
        writer
            .write_all(data)
            .map_err(|e| Error::Export(format!("{}: {}", name, e)))?;
    }

    writer
        .finish()
        .map_err(|e| Error::Export(e.to_string()))?;
    Ok(())
}

/// Export the store to a new archive file on disk
pub fn export_to_path<P: AsRef<Path>>(store: &PackageStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    export(store, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    fn manifest_store(version_json: &str) -> PackageStore {
        let mut store = PackageStore::new();
        store.set("extension/package.json", version_json.as_bytes().to_vec());
        store
    }

    fn manifest_version(store: &PackageStore) -> String {
        let bytes = store.get("extension/package.json").unwrap();
        let tree: Value = serde_json::from_slice(bytes).unwrap();
        tree["version"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_bump_increments_patch() {
        let mut store = manifest_store(r#"{"name": "x", "version": "1.2.3"}"#);
        assert!(bump_patch_version(&mut store));
        assert_eq!(manifest_version(&store), "1.2.4");
    }

    #[test]
    fn test_bump_twice_increments_twice() {
        let mut store = manifest_store(r#"{"version": "0.0.9"}"#);
        assert!(bump_patch_version(&mut store));
        assert!(bump_patch_version(&mut store));
        assert_eq!(manifest_version(&store), "0.0.11");
    }

    #[test]
    fn test_bump_rejects_non_triplet_forms() {
        for raw in [
            r#"{"version": "1.2"}"#,
            r#"{"version": "1.2.3-beta"}"#,
            r#"{"version": "1.2.3.4"}"#,
            r#"{"version": 123}"#,
            r#"{"name": "no version field"}"#,
            r#"not json"#,
        ] {
            let mut store = manifest_store(raw);
            let before = store.get("extension/package.json").unwrap().to_vec();
            assert!(!bump_patch_version(&mut store), "should not bump: {}", raw);
            // silent no-op leaves bytes untouched
            assert_eq!(store.get("extension/package.json"), Some(before.as_slice()));
        }
    }

    #[test]
    fn test_bump_missing_manifest_is_noop() {
        let mut store = PackageStore::new();
        store.set("readme.md", b"hi".to_vec());
        assert!(!bump_patch_version(&mut store));
    }

    #[test]
    fn test_bump_falls_back_to_bare_manifest_name() {
        let mut store = PackageStore::new();
        store.set("package.json", br#"{"version": "2.0.0"}"#.to_vec());
        assert!(bump_patch_version(&mut store));

        let tree: Value = serde_json::from_slice(store.get("package.json").unwrap()).unwrap();
        assert_eq!(tree["version"], Value::String("2.0.1".to_string()));
    }

    #[test]
    fn test_export_round_trip() {
        let mut store = PackageStore::new();
        store.set("b/binary.png", vec![0xff, 0xd8, 0x00, 0x01]);
        store.set("a.json", br#"{"k": "v"}"#.to_vec());

        let mut sink = Cursor::new(Vec::new());
        export(&store, &mut sink).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(sink.into_inner())).unwrap();
        assert_eq!(archive.len(), 2);

        // untouched entries come back byte-identical
        let mut reread = PackageStore::new();
        let mut sink = Cursor::new(Vec::new());
        export(&store, &mut sink).unwrap();
        reread.load(Cursor::new(sink.into_inner())).unwrap();
        assert_eq!(reread.get("b/binary.png"), store.get("b/binary.png"));
        assert_eq!(reread.get("a.json"), store.get("a.json"));

        // entries are written in sorted order
        let first = archive.by_index(0).unwrap().name().to_string();
        assert_eq!(first, "a.json");
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.vsix");

        let mut store = PackageStore::new();
        store.set("x.txt", b"x".to_vec());
        export_to_path(&store, &out).unwrap();

        let reread = PackageStore::open_path(&out).unwrap();
        assert_eq!(reread.get("x.txt"), Some(b"x".as_slice()));
    }

    #[test]
    fn test_export_unwritable_path() {
        let store = PackageStore::new();
        let err = export_to_path(&store, "/nonexistent-dir/out.vsix");
        assert!(matches!(err, Err(Error::Export(_))));
    }
}
