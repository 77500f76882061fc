//! Edit-distance similarity and stem resolution.
//!
//! Resolution is a two-phase heuristic: pick the stem nearest to the word by
//! normalized Levenshtein similarity, then require the word to be one of that
//! stem's inflections verbatim. There is no fallback to the runner-up.

use crate::models::NodeId;
use crate::tree::StemTree;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Dictionary is empty")]
    EmptyTree,
    #[error("{word} is not an inflection of its closest stem {closest}")]
    NoInflection { word: String, closest: String },
}

/// Levenshtein distance between `a` and `b`, counted in chars.
///
/// Substitution costs 1 when the chars differ, insertion and deletion cost 1.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let n = a.len();
    let m = b.len();

    // D[i][j] = d[i * (m+1) + j]
    let width = m + 1;
    let mut d = vec![0usize; (n + 1) * width];

    for i in 1..=n {
        d[i * width] = i;
    }
    for j in 1..=m {
        d[j] = j;
    }

    for i in 1..=n {
        let row = i * width;
        let prev_row = (i - 1) * width;
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let deletion = d[prev_row + j] + 1;
            let insertion = d[row + (j - 1)] + 1;
            let substitution = d[prev_row + (j - 1)] + cost;
            d[row + j] = deletion.min(insertion).min(substitution);
        }
    }

    d[n * width + m]
}

/// Normalized similarity in [0, 1]: `1 - distance / max(len(a), len(b))`.
///
/// Two empty strings are identical and score 1.0.
pub fn similarity(a: &str, b: &str) -> f32 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f32 / longest as f32
}

/// Highest-scoring candidate for `word`; the first one wins on ties.
pub fn best_match<'a, T, I>(word: &str, candidates: I) -> Option<(T, f32)>
where
    I: IntoIterator<Item = (T, &'a str)>,
{
    let mut best: Option<(T, f32)> = None;
    for (item, text) in candidates {
        let score = similarity(text, word);
        if best.as_ref().map_or(true, |(_, top)| score > *top) {
            best = Some((item, score));
        }
    }
    best
}

/// Resolve the stem an inflected `word` belongs to.
///
/// Scores every stem in pre-order, keeps the first maximum, and accepts it
/// only if `word` is literally in its inflection list.
pub fn resolve_stem_from_inflection(tree: &StemTree, word: &str) -> Result<NodeId, ResolveError> {
    let snapshot = tree.pre_order();
    let candidates = snapshot
        .iter()
        .filter_map(|&id| tree.get(id).map(|node| (id, node.stem.as_str())));

    let (id, score) = best_match(word, candidates).ok_or(ResolveError::EmptyTree)?;
    let node = tree.get(id).ok_or(ResolveError::EmptyTree)?;

    debug!(word, closest = %node.stem, score, "closest stem");

    if node.has_inflection(word) {
        Ok(id)
    } else {
        Err(ResolveError::NoInflection {
            word: word.to_string(),
            closest: node.stem.clone(),
        })
    }
}
