//! Name normalization and slug derivation for categories and tags.

/// Trims and collapses every whitespace run to a single space.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used for case-insensitive equality in uniqueness checks.
#[must_use]
pub fn case_key(value: &str) -> String {
    value.to_lowercase()
}

fn hyphenate(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Slug for a category.
///
/// An explicit slug is trimmed, hyphenated and lowercased. Otherwise the slug
/// is the lowercased, hyphenated name, suffixed with the parent's name when the
/// category has a parent (`Sports` under `India` gives `sports-india`).
#[must_use]
pub fn category_slug(name: &str, explicit: Option<&str>, parent_name: Option<&str>) -> String {
    if let Some(slug) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return hyphenate(slug).to_lowercase();
    }

    let base = hyphenate(&name.to_lowercase());
    match parent_name {
        Some(parent) => format!("{base}-{}", hyphenate(&parent.to_lowercase())),
        None => base,
    }
}

/// Slug for a tag.
///
/// Falls back to the lowercased name, then replaces whitespace with hyphens,
/// collapses hyphen runs and strips hyphens at either end. An explicit slug
/// keeps its case; uniqueness is checked case-insensitively anyway.
#[must_use]
pub fn tag_slug(name: &str, explicit: Option<&str>) -> String {
    let source = explicit
        .filter(|s| !s.trim().is_empty())
        .map_or_else(|| name.to_lowercase(), str::to_string);

    hyphenate(&source)
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
