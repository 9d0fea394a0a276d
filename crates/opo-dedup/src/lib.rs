//! Question deduplication for OpoQuiz
//!
//! This crate holds the text logic behind question generation: splitting a
//! topic's text into fragments, scoring how similar two questions are, and
//! picking the first generated candidate that does not repeat the recent
//! history of a user.
//!
//! It performs no I/O; the API crate feeds it model output and history rows.

mod fragments;
mod normalize;
mod similarity;

pub use fragments::{DEFAULT_MIN_FRAGMENT_LEN, fragments_or_whole, split_fragments};
pub use normalize::normalize;
pub use similarity::{max_similarity, token_set_ratio};

/// Default cutoff above which a candidate counts as a repeat.
pub const DEFAULT_SIMILARITY_THRESHOLD: u8 = 85;

/// Outcome of [`select_candidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Index of the chosen candidate in the input slice
    pub index: usize,
    /// Highest similarity (0-100) between the candidate and the history
    pub similarity: u8,
    /// `true` when every candidate reached the threshold and this one is
    /// only the least similar of them
    pub duplicate: bool,
}

/// Pick a candidate that does not repeat the history.
///
/// The first candidate whose [`max_similarity`] is strictly below
/// `threshold` is accepted. When none qualifies, the candidate with the
/// lowest similarity is returned with `duplicate` set. Ties keep the
/// earliest candidate.
///
/// Returns `None` when `candidates` is empty.
pub fn select_candidate<C, H>(candidates: &[C], history: &[H], threshold: u8) -> Option<Selection>
where
    C: AsRef<str>,
    H: AsRef<str>,
{
    let mut least_bad: Option<Selection> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let similarity = max_similarity(candidate.as_ref(), history);

        if similarity < threshold {
            return Some(Selection {
                index,
                similarity,
                duplicate: false,
            });
        }

        if least_bad.is_none_or(|best| similarity < best.similarity) {
            least_bad = Some(Selection {
                index,
                similarity,
                duplicate: true,
            });
        }
    }

    least_bad
}
