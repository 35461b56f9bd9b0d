/// Strips invisible marker characters and surrounding whitespace from a text cell.
pub(crate) fn normalize_text(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Canonical header: invisible markers removed and inner whitespace collapsed.
pub(crate) fn normalize_header(value: &str) -> String {
    normalize_text(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
