//! Normalization for candidate names arriving from manual entry or file
//! import.

use std::collections::HashSet;

/// Trim every name, drop blanks, drop duplicates keeping the first
/// occurrence.
pub fn normalize_candidates<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Split free text into candidate names.
///
/// Comma separated when the text has commas and no line breaks, otherwise
/// one name per line.
pub fn parse_manual_input(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if text.contains(',') && !text.contains('\n') {
        normalize_candidates(text.split(','))
    } else {
        normalize_candidates(text.lines())
    }
}
