use std::collections::BTreeSet;

use crate::normalize;

/// Token-overlap similarity between two texts, from 0 to 100.
///
/// Both texts are normalized and reduced to sorted sets of distinct words.
/// The shared words are compared against the shared words plus each side's
/// leftovers, and the best normalized Levenshtein ratio wins. Word order and
/// repetition do not matter, and a text whose words are all contained in the
/// other scores 100.
///
/// Returns 0 when either text has no words.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();

    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let shared = join(left.intersection(&right));
    let with_left = append(&shared, &join(left.difference(&right)));
    let with_right = append(&shared, &join(right.difference(&left)));

    let best = [
        ratio(&shared, &with_left),
        ratio(&shared, &with_right),
        ratio(&with_left, &with_right),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max);

    (best * 100.0).round() as u8
}

/// Highest [`token_set_ratio`] between `candidate` and any history entry.
pub fn max_similarity<H: AsRef<str>>(candidate: &str, history: &[H]) -> u8 {
    history
        .iter()
        .map(|previous| token_set_ratio(candidate, previous.as_ref()))
        .max()
        .unwrap_or(0)
}

fn join<'a, 'b: 'a>(words: impl Iterator<Item = &'a &'b str>) -> String {
    words.copied().collect::<Vec<_>>().join(" ")
}

fn append(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}
