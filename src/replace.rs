//! Bulk find & replace across structured documents
//!
//! Visits every string leaf of every structured document in the store and
//! substitutes a literal needle. Only string values are targets: map keys
//! and non-string scalars are never touched, and entries with zero matches
//! keep their exact bytes.

use regex::{NoExpand, Regex};
use serde_json::Value;

use crate::document::{is_structured_document, DocumentCache};
use crate::store::PackageStore;

/// Outcome of one [`replace_all`] run
#[derive(Debug, Default, Clone)]
pub struct ReplaceReport {
    /// Total occurrences replaced across all entries
    pub occurrences: u64,
    /// Number of entries with at least one replacement
    pub entries_modified: u64,
    /// Entries skipped because they failed to parse: (name, reason)
    pub skipped: Vec<(String, String)>,
}

/// Replace every occurrence of `needle` in all string leaves of all
/// structured documents in the store
///
/// The needle is a literal, not a pattern: regex metacharacters in it match
/// themselves. Case-insensitive mode counts non-overlapping leftmost-first
/// matches, the same positions the substitution rewrites. An empty needle is
/// a no-op. Entries are processed in sorted name order so counts are
/// reproducible, and only entries with at least one occurrence are
/// re-serialized. Parse failures are recorded in the report and never abort
/// the batch.
///
/// # Example
/// ```
/// use vsixedit::{replace_all, DocumentCache, PackageStore};
///
/// let mut store = PackageStore::new();
/// store.set("a.json", br#"{"msg": "Hello World"}"#.to_vec());
/// let mut cache = DocumentCache::new();
///
/// let report = replace_all(&mut store, &mut cache, "hello", "Hi", false);
/// assert_eq!(report.occurrences, 1);
/// ```
pub fn replace_all(
    store: &mut PackageStore,
    cache: &mut DocumentCache,
    needle: &str,
    replacement: &str,
    case_sensitive: bool,
) -> ReplaceReport {
    let mut report = ReplaceReport::default();
    if needle.is_empty() {
        return report;
    }

    // Escaped literals always compile
    let matcher = if case_sensitive {
        None
    } else {
        Regex::new(&format!("(?i){}", regex::escape(needle))).ok()
    };

    let names: Vec<String> = store
        .list()
        .filter(|n| is_structured_document(n))
        .map(str::to_string)
        .collect();

    for name in names {
        let tree = match cache.tree_mut(&*store, &name) {
            Ok(tree) => tree,
            Err(e) => {
                report.skipped.push((name, e.to_string()));
                continue;
            }
        };

        let count = replace_in_tree(tree, needle, replacement, matcher.as_ref());
        if count == 0 {
            continue;
        }

        match cache.serialize(store, &name) {
            Ok(()) => {
                report.occurrences += count;
                report.entries_modified += 1;
            }
            Err(e) => report.skipped.push((name, e.to_string())),
        }
    }

    report
}

fn replace_in_tree(
    value: &mut Value,
    needle: &str,
    replacement: &str,
    matcher: Option<&Regex>,
) -> u64 {
    match value {
        Value::Object(map) => map
            .values_mut()
            .map(|v| replace_in_tree(v, needle, replacement, matcher))
            .sum(),
        Value::Array(items) => items
            .iter_mut()
            .map(|v| replace_in_tree(v, needle, replacement, matcher))
            .sum(),
        Value::String(s) => {
            let count = match matcher {
                Some(re) => re.find_iter(s).count() as u64,
                None => s.matches(needle).count() as u64,
            };
            if count > 0 {
                *s = match matcher {
                    Some(re) => re.replace_all(s, NoExpand(replacement)).into_owned(),
                    None => s.replace(needle, replacement),
                };
            }
            count
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &[u8])]) -> PackageStore {
        let mut store = PackageStore::new();
        for (name, bytes) in entries {
            store.set(*name, bytes.to_vec());
        }
        store
    }

    fn entry_text<'a>(store: &'a PackageStore, name: &str) -> &'a str {
        std::str::from_utf8(store.get(name).unwrap()).unwrap()
    }

    #[test]
    fn test_case_insensitive_replace() {
        let mut store = store_with(&[
            ("a.json", br#"{"msg": "Hello World"}"#),
            ("b.json", br#"{"msg": "no match here"}"#),
        ]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "hello", "Hi", false);

        assert_eq!(report.occurrences, 1);
        assert_eq!(report.entries_modified, 1);
        assert!(report.skipped.is_empty());

        let text = entry_text(&store, "a.json");
        assert!(text.contains("Hi World"));
        assert!(!text.contains("Hello"));
    }

    #[test]
    fn test_case_sensitive_replace() {
        let mut store = store_with(&[("a.json", br#"{"msg": "Hello hello HELLO"}"#)]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "hello", "hi", true);

        assert_eq!(report.occurrences, 1);
        assert!(entry_text(&store, "a.json").contains("Hello hi HELLO"));
    }

    #[test]
    fn test_untouched_entries_keep_bytes() {
        let raw: &[u8] = b"{\"msg\":\"no match\"}";
        let mut store = store_with(&[("a.json", raw), ("hit.json", br#"{"m": "needle"}"#)]);
        let mut cache = DocumentCache::new();

        replace_all(&mut store, &mut cache, "needle", "thread", true);

        // zero-match entry is byte-identical, not re-serialized
        assert_eq!(store.get("a.json"), Some(raw));
        assert!(entry_text(&store, "hit.json").contains("thread"));
    }

    #[test]
    fn test_non_string_scalars_are_not_targets() {
        let raw: &[u8] = br#"{"n": 42, "list": [42, false, null]}"#;
        let mut store = store_with(&[("a.json", raw)]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "42", "99", true);

        assert_eq!(report.occurrences, 0);
        assert_eq!(report.entries_modified, 0);
        assert_eq!(store.get("a.json"), Some(raw));
    }

    #[test]
    fn test_map_keys_are_not_targets() {
        let mut store = store_with(&[("a.json", br#"{"needle": "needle"}"#)]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "needle", "thread", true);

        assert_eq!(report.occurrences, 1);
        let text = entry_text(&store, "a.json");
        assert!(text.contains("\"needle\": \"thread\""));
    }

    #[test]
    fn test_empty_needle_is_noop() {
        let raw: &[u8] = br#"{"a": "b"}"#;
        let mut store = store_with(&[("a.json", raw)]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "", "x", true);

        assert_eq!(report.occurrences, 0);
        assert_eq!(store.get("a.json"), Some(raw));
    }

    #[test]
    fn test_needle_is_literal_not_pattern() {
        let mut store = store_with(&[("a.json", br#"{"m": "price (a.b)"}"#)]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "(a.b)", "[c]", false);

        assert_eq!(report.occurrences, 1);
        assert!(entry_text(&store, "a.json").contains("price [c]"));
    }

    #[test]
    fn test_parse_failure_is_skipped_not_fatal() {
        let bad: &[u8] = b"{ not json";
        let mut store = store_with(&[
            ("bad.json", bad),
            ("good.json", br#"{"m": "target"}"#),
            ("skip.png", b"target"),
        ]);
        let mut cache = DocumentCache::new();

        let report = replace_all(&mut store, &mut cache, "target", "done", true);

        assert_eq!(report.occurrences, 1);
        assert_eq!(report.entries_modified, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "bad.json");
        // failed entry retains its last-good bytes, binaries are never touched
        assert_eq!(store.get("bad.json"), Some(bad));
        assert_eq!(store.get("skip.png"), Some(b"target".as_slice()));
    }

    #[test]
    fn test_replacement_dollar_signs_are_literal() {
        let mut store = store_with(&[("a.json", br#"{"m": "cost"}"#)]);
        let mut cache = DocumentCache::new();

        replace_all(&mut store, &mut cache, "cost", "$1 fee", false);
        assert!(entry_text(&store, "a.json").contains("$1 fee"));
    }
}
