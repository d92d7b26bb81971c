// src/utils/text.rs

//! Text normalization helpers.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

/// Normalize a name for comparison.
///
/// Case-folds, strips diacritics via NFKD decomposition, and removes all
/// whitespace, so stored "Dela Cruz" matches submitted "dela cruz" or
/// "Déla Cruz ".
pub fn normalize_name(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Truncate to at most `max` grapheme clusters, appending an ellipsis when
/// anything was cut. Never splits a cluster.
pub fn truncate_graphemes(input: &str, max: usize) -> String {
    match input.grapheme_indices(true).nth(max) {
        Some((idx, _)) => format!("{}...", &input[..idx]),
        None => input.to_string(),
    }
}
