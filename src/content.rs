use unicode_normalization::UnicodeNormalization;

/// NFKC-normalizes a whole source document before any cell is looked at, so
/// full-width punctuation such as `（` `）` `～` matches the half-width patterns.
pub fn normalize_document(raw: &str) -> String {
    raw.nfkc().collect()
}

/// Removes embedded line breaks from a cell's text.
///
/// Cells wrap across lines in the source markup; the break carries no meaning.
pub fn strip_newlines(s: &str) -> String {
    if s.contains(['\n', '\r']) {
        s.replace(['\n', '\r'], "")
    } else {
        s.to_string()
    }
}

/// `strip_newlines` followed by trimming surrounding whitespace.
pub fn clean_cell(s: &str) -> String {
    let stripped = strip_newlines(s);
    let trimmed = stripped.trim();
    if trimmed.len() == stripped.len() {
        stripped
    } else {
        trimmed.to_string()
    }
}
