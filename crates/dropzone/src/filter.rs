//! Acceptance and size predicates.
//!
//! Both are total and pure: an unrecognized MIME type fails to match, it never errors.

use crate::criteria::CriteriaSpec;
use crate::item::ItemDescriptor;

/// Declared MIME types some hosts report for files they do recognize by name.
/// Firefox before 53 reports `application/x-moz-file` for every dragged file.
const PLACEHOLDER_MIME_TYPES: &[&str] = &["", "application/x-moz-file", "application/octet-stream"];

fn is_placeholder(mime_type: &str) -> bool {
    let trimmed = mime_type.trim();
    PLACEHOLDER_MIME_TYPES.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Returns true if the item's type matches at least one accept pattern.
///
/// Each pattern is evaluated on its own and the results are OR-ed:
/// - extension patterns compare against the item name
/// - MIME patterns compare against the declared type; when that is empty or a
///   placeholder, they compare against the types implied by the file extension instead
pub fn accepts(item: &ItemDescriptor, criteria: &CriteriaSpec) -> bool {
    if criteria.accept.is_empty() {
        return true;
    }

    let declared = item.mime_type.trim();
    let guessed: Vec<String> = if is_placeholder(declared) {
        mime_guess::from_path(&item.name).iter().map(|m| m.essence_str().to_string()).collect()
    } else {
        Vec::new()
    };

    criteria.accept.iter().any(|pattern| {
        pattern.matches_name(&item.name)
            || pattern.matches_mime(declared)
            || guessed.iter().any(|mime| pattern.matches_mime(mime))
    })
}

/// Returns true if `min_size <= size <= max_size`.
pub fn size_ok(item: &ItemDescriptor, criteria: &CriteriaSpec) -> bool {
    criteria.min_size <= item.size && item.size <= criteria.max_size
}

/// Both predicates.
pub fn passes(item: &ItemDescriptor, criteria: &CriteriaSpec) -> bool {
    accepts(item, criteria) && size_ok(item, criteria)
}
