//! Column name resolution.
//!
//! Raw header cells become the stable field ids of the mapping, so the
//! result must be unique and must not depend on anything but the input.

use std::collections::BTreeSet;

/// Prefix for the placeholder given to blank header cells.
pub const PLACEHOLDER_PREFIX: &str = "Column";

/// Trims whitespace and byte order marks from a header cell, preserving the
/// original casing.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_string()
}

/// Placeholder for a blank header cell at `index` (0-based).
pub fn placeholder_name(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX} {}", index + 1)
}

/// Turns raw header names into unique, order-preserving identifiers.
///
/// Blank cells become `Column N` (1-indexed position). Repeated names keep
/// their first occurrence and get ` 2`, ` 3`, ... appended on later ones,
/// skipping any candidate that is already taken.
pub fn resolve_unique_names<S: AsRef<str>>(raw_names: &[S]) -> Vec<String> {
    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut resolved = Vec::with_capacity(raw_names.len());

    for (index, raw) in raw_names.iter().enumerate() {
        let mut base = normalize_header(raw.as_ref());
        if base.is_empty() {
            base = placeholder_name(index);
        }

        let name = if used.contains(&base) {
            next_free_suffix(&base, &used)
        } else {
            base
        };
        used.insert(name.clone());
        resolved.push(name);
    }

    resolved
}

fn next_free_suffix(base: &str, used: &BTreeSet<String>) -> String {
    let mut counter = 2usize;
    loop {
        let candidate = format!("{base} {counter}");
        if !used.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
