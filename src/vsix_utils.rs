//! VSIX bundle utility functions
//!
//! This module contains the CLI-level operations: listing, inspecting,
//! editing, bulk replacing, extracting, and exporting bundles.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::{
    document::{entry_kind, is_structured_document, preview_text, EntryKind},
    export::{bump_patch_version, export_to_path},
    replace::replace_all,
    utils::{create_glob_matcher, format_size, is_safe_entry_name, matches_filter},
    DocumentCache, PackageStore,
};

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Structured => "json",
        EntryKind::Text => "text",
        EntryKind::Image => "image",
        EntryKind::Code => "code",
        EntryKind::Other => "other",
    }
}

/// List entries in a bundle with optional filtering
pub fn list_entries(vsix_path: &Path, filter: Option<&str>) -> Result<()> {
    let store = open_bundle(vsix_path)?;
    let matcher = filter.map(create_glob_matcher).transpose()?;

    let mut count = 0u64;
    let mut total_size = 0u64;

    for (name, data) in store.iter() {
        if matches_filter(name, matcher.as_ref()) {
            println!(
                "{:>10} {:>6} {}",
                format_size(data.len() as u64),
                kind_label(entry_kind(name)),
                name
            );
            count += 1;
            total_size += data.len() as u64;
        }
    }

    println!();
    println!("Total: {} entries, {}", count, format_size(total_size));

    Ok(())
}

/// Show bundle summary information
pub fn show_info(vsix_path: &Path) -> Result<()> {
    let store = open_bundle(vsix_path)?;

    let mut total_size = 0u64;
    let mut structured = 0u64;
    let mut text = 0u64;
    let mut image = 0u64;
    let mut code = 0u64;
    let mut other = 0u64;

    for (name, data) in store.iter() {
        total_size += data.len() as u64;
        match entry_kind(name) {
            EntryKind::Structured => structured += 1,
            EntryKind::Text => text += 1,
            EntryKind::Image => image += 1,
            EntryKind::Code => code += 1,
            EntryKind::Other => other += 1,
        }
    }

    println!("Bundle Information:");
    println!("  File: {}", vsix_path.display());
    println!("  Total entries: {}", store.len());
    println!("  Uncompressed size: {}", format_size(total_size));
    println!();
    println!("Entry Kinds:");
    println!("  JSON/snippets: {}", structured);
    println!("  Text: {}", text);
    println!("  Images: {}", image);
    println!("  Code: {}", code);
    println!("  Other: {}", other);

    Ok(())
}

/// Print the address/value rows of one structured entry
///
/// `path_filter` and `value_filter` are case-insensitive substring filters
/// over the address and the rendered value respectively.
pub fn show_rows(
    vsix_path: &Path,
    entry: &str,
    path_filter: Option<&str>,
    value_filter: Option<&str>,
) -> Result<()> {
    let store = open_bundle(vsix_path)?;

    if !is_structured_document(entry) {
        bail!("{} is not a JSON or snippet entry", entry);
    }

    let mut cache = DocumentCache::new();
    let rows = cache
        .rows(&store, entry)
        .with_context(|| format!("Failed to read {}", entry))?;

    let matches = |text: &str, filter: Option<&str>| match filter {
        Some(f) => text.to_lowercase().contains(&f.to_lowercase()),
        None => true,
    };

    let mut shown = 0usize;
    for row in &rows {
        let rendered = row.value.to_string();
        if matches(&row.address, path_filter) && matches(&rendered, value_filter) {
            println!("{} = {}", row.address, rendered);
            shown += 1;
        }
    }

    println!();
    println!("{}/{} rows", shown, rows.len());

    Ok(())
}

/// Set one value by address in a structured entry and export the result
pub fn set_value(
    vsix_path: &Path,
    entry: &str,
    address: &str,
    raw_value: &str,
    output: &Path,
    bump: bool,
) -> Result<()> {
    let mut store = open_bundle(vsix_path)?;
    let mut cache = DocumentCache::new();

    cache
        .set_value(&store, entry, address, raw_value)
        .with_context(|| format!("Failed to set {} in {}", address, entry))?;
    cache.serialize(&mut store, entry)?;

    finish_export(&mut store, output, bump)?;
    println!("Set {} = {} in {}", address, raw_value, entry);

    Ok(())
}

/// Replace a literal string across every structured entry and export
pub fn replace_in_bundle(
    vsix_path: &Path,
    find: &str,
    replacement: &str,
    case_sensitive: bool,
    output: &Path,
    bump: bool,
) -> Result<()> {
    if find.is_empty() {
        bail!("Search string must not be empty");
    }

    let mut store = open_bundle(vsix_path)?;
    let mut cache = DocumentCache::new();

    let report = replace_all(&mut store, &mut cache, find, replacement, case_sensitive);

    for (name, reason) in &report.skipped {
        eprintln!("Warning: skipped {}: {}", name, reason);
    }

    if report.occurrences == 0 {
        println!("No occurrences of {:?} found", find);
        return Ok(());
    }

    finish_export(&mut store, output, bump)?;
    println!(
        "Replaced {} occurrence(s) across {} entr(y/ies)",
        report.occurrences, report.entries_modified
    );

    Ok(())
}

/// Print a text entry, marking binary content instead of dumping it
pub fn cat_entry(vsix_path: &Path, entry: &str) -> Result<()> {
    let store = open_bundle(vsix_path)?;
    let data = store
        .get(entry)
        .with_context(|| format!("Entry not found: {}", entry))?;

    match preview_text(data) {
        Some(text) => println!("{}", text),
        None => println!("<binary or non-utf8 content: {}>", format_size(data.len() as u64)),
    }

    Ok(())
}

/// Extract entries to a directory with optional filtering
pub fn extract_entries(vsix_path: &Path, filter: Option<&str>, output: &Path) -> Result<()> {
    let store = open_bundle(vsix_path)?;
    let matcher = filter.map(create_glob_matcher).transpose()?;

    let selected: Vec<(&str, &[u8])> = store
        .iter()
        .filter(|(name, _)| matches_filter(name, matcher.as_ref()))
        .collect();

    if selected.is_empty() {
        println!("No entries match the filter");
        return Ok(());
    }

    println!("Extracting {} entries...", selected.len());

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )?);

    let mut skipped = 0u64;

    for &(name, data) in &selected {
        pb.set_message(name.to_string());

        // Entry names are untrusted; never let one climb out of the output dir
        if !is_safe_entry_name(name) {
            pb.println(format!("Warning: skipped unsafe entry name: {}", name));
            skipped += 1;
            pb.inc(1);
            continue;
        }

        let destination = output.join(name);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;
        file.write_all(data)?;

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!("\nExtracted to {}", output.display());
    if skipped > 0 {
        println!("Skipped {} entr(y/ies) with unsafe names", skipped);
    }

    Ok(())
}

/// Repackage a bundle as-is (optionally bumping the manifest version)
pub fn export_bundle(vsix_path: &Path, output: &Path, bump: bool) -> Result<()> {
    let mut store = open_bundle(vsix_path)?;
    finish_export(&mut store, output, bump)
}

fn open_bundle(vsix_path: &Path) -> Result<PackageStore> {
    PackageStore::open_path(vsix_path)
        .with_context(|| format!("Failed to open {}", vsix_path.display()))
}

fn finish_export(store: &mut PackageStore, output: &Path, bump: bool) -> Result<()> {
    if bump && bump_patch_version(store) {
        println!("Bumped manifest patch version");
    }

    export_to_path(store, output)
        .with_context(|| format!("Failed to export {}", output.display()))?;
    println!("Exported: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_extract_skips_entries_that_climb_out() {
        let dir = tempfile::tempdir().unwrap();

        let bundle = dir.path().join("evil.vsix");
        let mut writer = ZipWriter::new(File::create(&bundle).unwrap());
        writer
            .start_file("../escape.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"out").unwrap();
        writer
            .start_file("safe.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"in").unwrap();
        writer.finish().unwrap();

        let out = dir.path().join("inner");
        fs::create_dir_all(&out).unwrap();
        extract_entries(&bundle, None, &out).unwrap();

        assert!(out.join("safe.txt").exists());
        // the traversal entry must not materialize next to the output dir
        assert!(!dir.path().join("escape.txt").exists());
        assert!(!out.join("../escape.txt").exists());
    }
}
