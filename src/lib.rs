//! # vsixedit
//!
//! A Rust library for inspecting and editing VSIX extension bundles.
//!
//! ## Overview
//!
//! VSIX files (VS Code / Visual Studio extension packages) are ZIP archives
//! whose payload is mostly JSON documents plus free text and binary assets.
//! This library provides:
//!
//! - Loading a bundle into an in-memory [`PackageStore`] (entry name to bytes)
//! - Flattening JSON entries into editable `address = value` rows
//! - Writing values back by address, with JSON-literal-or-string coercion
//! - Bulk find & replace across every string leaf of every JSON entry
//! - Deterministic re-export to a new bundle, with an optional patch-version
//!   bump of the manifest
//!
//! ## Example - Inspecting
//!
//! ```rust,no_run
//! use vsixedit::{DocumentCache, PackageStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = PackageStore::open_path("extension.vsix")?;
//!
//!     for name in store.list() {
//!         println!("{}", name);
//!     }
//!
//!     let mut cache = DocumentCache::new();
//!     for row in cache.rows(&store, "extension/package.json")? {
//!         println!("{} = {}", row.address, row.value);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Editing and exporting
//!
//! ```rust,no_run
//! use vsixedit::{bump_patch_version, export_to_path, DocumentCache, PackageStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut store = PackageStore::open_path("extension.vsix")?;
//!     let mut cache = DocumentCache::new();
//!
//!     cache.set_value(&store, "extension/package.json", "displayName", "My Fork")?;
//!     cache.serialize(&mut store, "extension/package.json")?;
//!
//!     bump_patch_version(&mut store);
//!     export_to_path(&store, "extension-forked.vsix")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Bulk replace
//!
//! ```rust,no_run
//! use vsixedit::{replace_all, DocumentCache, PackageStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut store = PackageStore::open_path("extension.vsix")?;
//!     let mut cache = DocumentCache::new();
//!
//!     let report = replace_all(&mut store, &mut cache, "Hello", "Bonjour", false);
//!     println!(
//!         "{} occurrences in {} entries",
//!         report.occurrences, report.entries_modified
//!     );
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod export;
pub mod path_codec;
pub mod replace;
pub mod store;
pub mod utils;
pub mod vsix_utils;

pub use document::{
    entry_kind, is_structured_document, to_canonical_string, DocumentCache, EntryKind,
};
pub use error::{Error, Result};
pub use export::{bump_patch_version, export, export_to_path, MANIFEST_NAMES};
pub use path_codec::{coerce_value, flatten, parse_address, write_at, FlatRow, PathStep};
pub use replace::{replace_all, ReplaceReport};
pub use store::PackageStore;
