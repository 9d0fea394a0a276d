/// Minimum length, in characters, of a paragraph kept as a fragment.
pub const DEFAULT_MIN_FRAGMENT_LEN: usize = 150;

/// Split a topic's text into paragraph fragments.
///
/// Paragraphs are separated by a blank line. Each one is trimmed and kept
/// only when it is strictly longer than `min_len` characters, so headings
/// and index lines are skipped.
pub fn split_fragments(text: &str, min_len: usize) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| paragraph.chars().count() > min_len)
        .collect()
}

/// Like [`split_fragments`], but falls back to the whole trimmed text when
/// no paragraph is long enough.
pub fn fragments_or_whole(text: &str, min_len: usize) -> Vec<&str> {
    let fragments = split_fragments(text, min_len);
    if fragments.is_empty() {
        vec![text.trim()]
    } else {
        fragments
    }
}
