use unicode_normalization::UnicodeNormalization;

/// Normalize text before comparing questions.
///
/// Lowercases, expands a few ligatures, strips diacritics through NFD
/// decomposition, drops punctuation (including `¿` and `¡`) and collapses
/// whitespace. `"¿Qué órgano?"` and `"que organo"` normalize to the same
/// string.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace('ß', "ss")
        .replace('æ', "ae")
        .replace('œ', "oe")
        .nfd()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || is_separator(c) {
                Some(' ')
            } else {
                None
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Punctuation that separates words rather than decorating them.
const fn is_separator(c: char) -> bool {
    matches!(c, '-' | '/' | '_' | '.' | ',' | ';' | ':' | '(' | ')' | '"' | '\'')
}
